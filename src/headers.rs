// Column discovery for heterogeneous price-list headers
//
// Every supplier names its columns differently. A header row is matched
// against a fixed synonym table; a file is only usable when all three roles
// are found.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ROLES & SYNONYMS
// ============================================================================

/// Role - the semantic purpose a column must serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Name,
    Price,
    Weight,
}

impl Role {
    /// All roles, in the order they are reported
    pub const ALL: [Role; 3] = [Role::Name, Role::Price, Role::Weight];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Name => "name",
            Role::Price => "price",
            Role::Weight => "weight",
        }
    }

    /// Accepted header tokens for this role
    pub fn synonyms(&self) -> &'static [&'static str] {
        SYNONYMS
            .iter()
            .find(|(role, _)| role == self)
            .map(|(_, tokens)| *tokens)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header tokens accepted for each role. Matching is exact: no case folding,
/// no trimming. New synonyms are added here, not in `resolve`.
pub const SYNONYMS: &[(Role, &[&str])] = &[
    (Role::Name, &["название", "продукт", "товар", "наименование"]),
    (Role::Price, &["цена", "розница"]),
    (Role::Weight, &["фасовка", "масса", "вес"]),
];

/// Look up which role a single header cell plays, if any
pub fn role_of(header: &str) -> Option<Role> {
    SYNONYMS
        .iter()
        .find(|(_, tokens)| tokens.contains(&header))
        .map(|(role, _)| *role)
}

// ============================================================================
// COLUMN MAPPING
// ============================================================================

/// ColumnMapping - where each role lives in one file's rows
///
/// Resolution is all-or-nothing: if any role has no column, the mapping is
/// `Unresolved` and exposes no index for any role. `missing` only says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ColumnMapping {
    Resolved {
        name: usize,
        price: usize,
        weight: usize,
    },
    Unresolved {
        missing: Vec<Role>,
    },
}

impl ColumnMapping {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ColumnMapping::Resolved { .. })
    }

    /// Column index for a role; `None` for every role when unresolved
    pub fn column(&self, role: Role) -> Option<usize> {
        match self {
            ColumnMapping::Resolved {
                name,
                price,
                weight,
            } => Some(match role {
                Role::Name => *name,
                Role::Price => *price,
                Role::Weight => *weight,
            }),
            ColumnMapping::Unresolved { .. } => None,
        }
    }

    /// Roles that had no matching header (empty when resolved)
    pub fn missing(&self) -> &[Role] {
        match self {
            ColumnMapping::Resolved { .. } => &[],
            ColumnMapping::Unresolved { missing } => missing,
        }
    }
}

/// Resolve a header row into a column mapping.
///
/// Headers are scanned left to right; the first header matching a role wins,
/// whichever synonym it is.
pub fn resolve<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut found: [Option<usize>; 3] = [None; 3];

    for (idx, header) in headers.iter().enumerate() {
        if let Some(role) = role_of(header.as_ref()) {
            let slot = &mut found[role_slot(role)];
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
    }

    match found {
        [Some(name), Some(price), Some(weight)] => ColumnMapping::Resolved {
            name,
            price,
            weight,
        },
        _ => ColumnMapping::Unresolved {
            missing: Role::ALL
                .into_iter()
                .filter(|role| found[role_slot(*role)].is_none())
                .collect(),
        },
    }
}

fn role_slot(role: Role) -> usize {
    match role {
        Role::Name => 0,
        Role::Price => 1,
        Role::Weight => 2,
    }
}

// ============================================================================
// TESTS
// ============================================================================
