use crate::builtin::{Cd, Clear, Echo, Exit, Mkdir, Pwd, Rmdir, Touch};
use crate::command::Command;
use crate::delegated::{Passthrough, Rm};
use std::collections::BTreeMap;

/// The fixed allow-list of commands.
///
/// Built once; there is no way to add or remove entries afterwards, so a name
/// that is not registered at startup can never be executed.
pub struct Registry {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl Registry {
    pub(crate) fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            commands: commands.into_iter().map(|cmd| (cmd.name(), cmd)).collect(),
        }
    }

    /// Look up a handler by its exact, case-sensitive name.
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }

    /// Registered names in lexical order.
    #[cfg(test)]
    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}

impl Default for Registry {
    /// The standard command set:
    /// - direct: `cd`, `pwd`, `echo`, `mkdir`, `rmdir`, `touch`, `clear`, `exit`
    /// - delegated: `ls`, `cat`, `rm`, `ping`, `nano`, `sl`
    fn default() -> Self {
        Self::new(vec![
            Box::new(Passthrough::inherit("ls")),
            Box::new(Cd),
            Box::new(Pwd),
            Box::new(Echo),
            Box::new(Passthrough::inherit("cat")),
            Box::new(Mkdir),
            Box::new(Rmdir),
            Box::new(Rm),
            Box::new(Touch),
            Box::new(Clear),
            Box::new(Passthrough::captured("ping", "destination address")),
            Box::new(Exit),
            Box::new(Passthrough::inherit("nano")),
            Box::new(Passthrough::inherit("sl")),
        ])
    }
}
