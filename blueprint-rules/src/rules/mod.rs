use crate::rule::Rule;
use blueprint_types::{Profile, Violation};

mod connections;
mod fields;
mod modules;

pub(crate) use connections::{
    ENTRYPOINT_EXISTS, MIN_ONE_CONNECTION, NO_ORPHAN_CONNECTIONS, NO_SELF_LOOPS,
    NO_TWO_NODE_CYCLES, OUTPUT_EXISTS, TRIGGER_ID_REFERENCE,
};
pub(crate) use fields::{
    NAME_LENGTH, NAME_PRESENT, REQUIRED_FIELDS, TRIGGER_ID_PRESENT, TRIGGER_SHAPE,
    VERSION_FORMAT,
};
pub(crate) use modules::{
    ACTION_STRUCTURE, ACTIONS_NOT_EMPTY, MODULE_ID_FORMAT, MODULE_PARAMS_OBJECT,
    MODULE_TYPES_PRESENT, MODULES_STRUCTURE, UNIQUE_MODULE_IDS,
};

/// Built-in rules for `profile`, in evaluation order.
pub fn builtin_rules(profile: Profile) -> Vec<Box<dyn Rule>> {
    match profile {
        Profile::Make => vec![
            Box::new(fields::RequiredFields::make()),
            Box::new(fields::VersionFormat::make()),
            Box::new(fields::NameLength),
            Box::new(fields::TriggerIdPresent),
            Box::new(modules::ModulesStructure),
            Box::new(modules::UniqueModuleIds),
            Box::new(connections::NoOrphanConnections),
            Box::new(modules::ModuleIdFormat),
            Box::new(connections::TriggerIdReference),
            Box::new(connections::NoSelfLoops),
            Box::new(connections::NoTwoNodeCycles),
            Box::new(connections::EntrypointExists),
            Box::new(modules::ModuleParamsObject),
        ],
        Profile::Legacy => vec![
            Box::new(fields::RequiredFields::legacy()),
            Box::new(fields::VersionFormat::legacy()),
            Box::new(fields::NameLength),
            Box::new(fields::TriggerShape),
            Box::new(modules::ActionsNotEmpty),
            Box::new(modules::ActionStructure),
        ],
        Profile::Graph => vec![
            Box::new(modules::UniqueModuleIds),
            Box::new(connections::NoOrphanConnections),
            Box::new(fields::NamePresent),
            Box::new(fields::NameLength),
            Box::new(connections::MinOneConnection),
            Box::new(modules::ModuleTypesPresent),
            Box::new(modules::ModuleParamsObject),
            Box::new(modules::ModuleIdFormat),
            Box::new(connections::NoSelfLoops),
            Box::new(connections::NoTwoNodeCycles),
            Box::new(connections::EntrypointExists),
            Box::new(connections::OutputExists),
        ],
    }
}

fn v(path: impl Into<String>, message: impl Into<String>, rule: &str) -> Violation {
    Violation::new(path, message, rule)
}
