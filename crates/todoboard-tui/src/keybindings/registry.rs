use super::{
    board::{ErrorViewProvider, KanbanProvider, TaskListProvider},
    dialog_modes::{CredentialGateProvider, FilterDialogProvider, HelpProvider, PromptProvider},
    KeybindingProvider,
};
use crate::prompt::PromptKind;

/// Which set of bindings is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingScope {
    Gate,
    Kanban,
    TaskList,
    Error,
    Prompt(PromptKind),
    Filter,
    Help,
}

pub struct KeybindingRegistry;

impl KeybindingRegistry {
    pub fn get_provider(scope: BindingScope) -> Box<dyn KeybindingProvider> {
        match scope {
            BindingScope::Gate => Box::new(CredentialGateProvider),
            BindingScope::Kanban => Box::new(KanbanProvider),
            BindingScope::TaskList => Box::new(TaskListProvider),
            BindingScope::Error => Box::new(ErrorViewProvider),
            BindingScope::Prompt(kind) => Box::new(PromptProvider::new(kind)),
            BindingScope::Filter => Box::new(FilterDialogProvider),
            BindingScope::Help => Box::new(HelpProvider),
        }
    }
}
