//! Command Catalog
//!
//! The fixed table of vetted commands the console offers, each with a short
//! button label and a human-readable explanation. The table is built once and
//! never mutated. Membership is advisory: a command that is not catalogued can
//! still be sent, it just has no explanation.

use std::collections::HashMap;

/// Menu section a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandGroup {
    /// Read-only status queries
    Show,
    /// Actions that clear device state
    Clear,
}

impl CommandGroup {
    /// Menu sections in display order
    pub const ALL: [CommandGroup; 2] = [CommandGroup::Show, CommandGroup::Clear];

    /// Section heading
    pub fn title(&self) -> &'static str {
        match self {
            CommandGroup::Show => "show",
            CommandGroup::Clear => "clear",
        }
    }

    /// Group a command by its leading verb
    pub fn of(command: &str) -> Option<Self> {
        match command.split_whitespace().next() {
            Some("show") => Some(CommandGroup::Show),
            Some("clear") => Some(CommandGroup::Clear),
            _ => None,
        }
    }
}

/// A single catalogued command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub command: &'static str,
    pub label: &'static str,
    pub explanation: &'static str,
    pub group: CommandGroup,
}

/// (command, menu label, explanation)
const BUILT_IN: &[(&str, &str, &str)] = &[
    (
        "show running config",
        "running config",
        "This displays the entire running config. Or the config that is currently being used. \
         If the commmand: \"copy run start\" (the command: \"write\" also works), is used - then \
         the changes from running config will be applied to starting config",
    ),
    (
        "show ip interface brief",
        "ip interfaces",
        "This displays the interfaces and their status",
    ),
    (
        "show run | include ip route",
        "ip routes",
        "This displays the current static ip route configuration. Not to be confused by \
         \"show ip route\" - which is the ip routes that have been manually configured, \
         connected, or discovered by routing protocols i.e. OSPF, BGP, EIGRP, etc...",
    ),
    (
        "show ip ospf neighbor brief",
        "ip os ne br",
        "This displays active OSPFv2 neighborships - OSPFv2 meaning the interface that is \
         advertising routes are advertised as IPv4 (as OSPFv2 only supports IPv4)",
    ),
    (
        "show ospf neighbor brief",
        "os ne br",
        "This displays active OSPFv3 neighborships - OSPFv3 meaning the interface that is \
         advertising routes are advertised as IPv6 (OSPFv3 is the only OSPF ver that supports IPv6)",
    ),
    (
        "clear crypto ikev2 sa",
        "crypto ikev2 sa",
        "This clears all sa's (or security associations), generally this is used to clear a bad \
         security association or a stuck association *hint* this is for VPN connections",
    ),
    (
        "show crypto ikev2 client flexvpn",
        "crypto ikev2 client",
        "This shows flexvpn current status - meaning the target peer status for SA's \
         (Security Associations).",
    ),
    (
        "show run | section flexvpn",
        "flexvpn config",
        "This shows the flexvpn configuration - it'll show the configured target peers for SA's \
         (Security Associations)",
    ),
];

/// Read-only command table with O(1) lookup and stable iteration order
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<&'static str, usize>,
}

impl CommandCatalog {
    /// Catalog of the built-in command table
    pub fn built_in() -> Self {
        let entries = BUILT_IN
            .iter()
            .filter_map(|&(command, label, explanation)| {
                CommandGroup::of(command).map(|group| CatalogEntry {
                    command,
                    label,
                    explanation,
                    group,
                })
            })
            .collect();
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.command, position))
            .collect();
        Self { entries, index }
    }

    /// Explanation for an exact, case-sensitive command match
    pub fn lookup(&self, command: &str) -> Option<&'static str> {
        self.entry(command).map(|entry| entry.explanation)
    }

    /// Full entry for an exact command match
    pub fn entry(&self, command: &str) -> Option<&CatalogEntry> {
        self.index.get(command).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, command: &str) -> bool {
        self.index.contains_key(command)
    }

    /// All entries in table order
    pub fn all(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Entries of one menu group, in table order
    pub fn group(&self, group: CommandGroup) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.group == group)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::built_in()
    }
}
