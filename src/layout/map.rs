//! Button-to-symbol binding store with a derived symbol lookup

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Error type for layout map operations
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Operation referenced a button that is not in the map
    #[error("unknown button {0:?}")]
    UnknownButton(String),
    /// Attempted to create a button that already exists
    #[error("button {0:?} already exists")]
    DuplicateButton(String),
    /// Attempted to unbind a symbol that is not bound to that button
    #[error("symbol {symbol:?} is not bound to button {button:?}")]
    NotBound { symbol: String, button: String },
    /// Mutation would bind at least one symbol to more than one button
    #[error("symbol map is not unique: {conflicts:?}")]
    NonUniqueBinding {
        conflicts: BTreeMap<String, Vec<String>>,
    },
}

/// What to do when a mutation leaves a symbol bound to several buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConflictPolicy {
    /// Commit the mutation, log a warning and keep the conflict report
    /// retrievable via [`ButtonMap::conflicts`]
    #[default]
    Warn,
    /// Roll the mutation back and return an error, keeping the map unique
    Reject,
}

/// Outcome of a successful [`ButtonMap::bind`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The symbol was added to the button's set
    Added,
    /// The symbol was already bound to that button; nothing changed
    AlreadyBound,
}

/// Bidirectional symbol/button mapping.
///
/// The authoritative relation is button -> symbols (one-to-many). The
/// derived symbol -> button relation must be a function for the map to
/// be reversible; it is fully recomputed after every mutation by
/// walking buttons in creation order, so a symbol bound to several
/// buttons is detected deterministically and reported rather than
/// silently resolved. The most recently created owner wins in the
/// derived view.
#[derive(Debug, Clone, Default)]
pub struct ButtonMap {
    /// Buttons in creation order; drives recompute determinism
    order: Vec<String>,
    /// Button -> bound symbols, in binding order
    bindings: HashMap<String, Vec<String>>,
    /// Derived symbol -> button view
    resolved: HashMap<String, String>,
    /// Symbols currently bound to more than one button, with all owners
    conflicts: BTreeMap<String, Vec<String>>,
    policy: ConflictPolicy,
}

impl ButtonMap {
    /// Create an empty map with the default (warn) conflict policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with an explicit conflict policy
    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Add a new button with an initial (possibly empty) symbol set.
    ///
    /// Fails with [`LayoutError::DuplicateButton`] if the name is taken.
    pub fn create_button(&mut self, button: &str, symbols: &[&str]) -> Result<(), LayoutError> {
        if self.bindings.contains_key(button) {
            return Err(LayoutError::DuplicateButton(button.to_string()));
        }
        self.order.push(button.to_string());
        self.bindings.insert(
            button.to_string(),
            symbols.iter().map(|s| s.to_string()).collect(),
        );
        self.commit_or_revert(|map| {
            map.order.pop();
            map.bindings.remove(button);
        })
    }

    /// Remove a button and all of its bindings.
    ///
    /// Fails with [`LayoutError::UnknownButton`] if absent.
    pub fn delete_button(&mut self, button: &str) -> Result<(), LayoutError> {
        if self.bindings.remove(button).is_none() {
            return Err(LayoutError::UnknownButton(button.to_string()));
        }
        self.order.retain(|b| b != button);
        // Removing bindings can only clear conflicts, never add them.
        self.rebuild();
        Ok(())
    }

    /// Bind a symbol to an existing button.
    ///
    /// Returns [`Binding::AlreadyBound`] (a no-op) when the symbol is
    /// already in that button's set. Under [`ConflictPolicy::Warn`] a
    /// bind that double-binds the symbol still commits; the offending
    /// symbols and their candidate buttons stay retrievable via
    /// [`ButtonMap::conflicts`].
    pub fn bind(&mut self, symbol: &str, button: &str) -> Result<Binding, LayoutError> {
        let Some(symbols) = self.bindings.get_mut(button) else {
            return Err(LayoutError::UnknownButton(button.to_string()));
        };
        if symbols.iter().any(|s| s == symbol) {
            return Ok(Binding::AlreadyBound);
        }
        symbols.push(symbol.to_string());
        self.commit_or_revert(|map| {
            if let Some(symbols) = map.bindings.get_mut(button) {
                symbols.pop();
            }
        })?;
        Ok(Binding::Added)
    }

    /// Remove a symbol from a button's set.
    ///
    /// Fails with [`LayoutError::NotBound`] (leaving the map unchanged)
    /// when the symbol is not currently bound to that button.
    pub fn unbind(&mut self, symbol: &str, button: &str) -> Result<(), LayoutError> {
        let Some(symbols) = self.bindings.get_mut(button) else {
            return Err(LayoutError::UnknownButton(button.to_string()));
        };
        let Some(pos) = symbols.iter().position(|s| s == symbol) else {
            return Err(LayoutError::NotBound {
                symbol: symbol.to_string(),
                button: button.to_string(),
            });
        };
        symbols.remove(pos);
        // Unbinding can only clear conflicts, never add them.
        self.rebuild();
        Ok(())
    }

    /// Look up the button a symbol resolves to.
    ///
    /// Returns `None` (not an error) for unrecognized symbols.
    pub fn resolve(&self, symbol: &str) -> Option<&str> {
        self.resolved.get(symbol).map(String::as_str)
    }

    /// All buttons, in creation order
    pub fn buttons(&self) -> &[String] {
        &self.order
    }

    /// All symbols currently resolvable, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.resolved.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn contains_button(&self, button: &str) -> bool {
        self.bindings.contains_key(button)
    }

    /// Symbols bound to a button, in binding order
    pub fn symbols_of(&self, button: &str) -> Option<&[String]> {
        self.bindings.get(button).map(Vec::as_slice)
    }

    /// Snapshot of the authoritative button -> symbols relation
    pub fn button_to_symbols(&self) -> HashMap<String, Vec<String>> {
        self.bindings.clone()
    }

    /// Snapshot of the derived symbol -> button relation
    pub fn symbol_to_button(&self) -> HashMap<String, String> {
        self.resolved.clone()
    }

    /// Symbols currently bound to more than one button, mapped to all
    /// candidate owners in creation order
    pub fn conflicts(&self) -> &BTreeMap<String, Vec<String>> {
        &self.conflicts
    }

    /// True when the derived symbol -> button view is a function
    pub fn is_unique(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Recompute the derived view and apply the conflict policy. The
    /// `revert` closure undoes the mutation when it must be rejected.
    fn commit_or_revert(&mut self, revert: impl FnOnce(&mut Self)) -> Result<(), LayoutError> {
        self.rebuild();
        if self.conflicts.is_empty() {
            return Ok(());
        }
        match self.policy {
            ConflictPolicy::Warn => {
                warn!("symbol map is not unique: {:?}", self.conflicts);
                Ok(())
            }
            ConflictPolicy::Reject => {
                let conflicts = std::mem::take(&mut self.conflicts);
                revert(self);
                self.rebuild();
                Err(LayoutError::NonUniqueBinding { conflicts })
            }
        }
    }

    /// Rebuild the symbol -> button view from scratch.
    ///
    /// Buttons are visited in creation order, so the conflict report is
    /// identical for identical histories and the last-created owner of
    /// a double-bound symbol ends up in the resolved view.
    fn rebuild(&mut self) {
        self.resolved.clear();
        self.conflicts.clear();
        for button in &self.order {
            let Some(symbols) = self.bindings.get(button) else {
                continue;
            };
            for symbol in symbols {
                if let Some(previous) = self.resolved.get(symbol) {
                    self.conflicts
                        .entry(symbol.clone())
                        .or_insert_with(|| vec![previous.clone()])
                        .push(button.clone());
                }
                self.resolved.insert(symbol.clone(), button.clone());
            }
        }
    }
}
