//! Static game tables that save records refer to by id.

use std::collections::HashSet;

use crate::error::{SchemaError, SchemaResult};
use crate::TableKind;

/// A player class as far as the save format cares.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDef {
    pub name: String,
    /// Number of spells the class can learn.
    pub total_spells: u16,
}

impl ClassDef {
    #[must_use]
    pub fn new(name: impl Into<String>, total_spells: u16) -> Self {
        Self {
            name: name.into(),
            total_spells,
        }
    }
}

/// Read-only tables passed to every encode/decode call.
///
/// Species, artifact, ego and activation ids are 1-based: id `n` names
/// entry `n - 1`, and `0` is reserved for "none". Race, class and object
/// kind indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameTables {
    pub species: Vec<String>,
    pub artifacts: Vec<String>,
    pub egos: Vec<String>,
    pub activations: Vec<String>,
    pub races: Vec<String>,
    pub classes: Vec<ClassDef>,
    /// Number of object kinds.
    pub kind_count: usize,
}

impl GameTables {
    /// Creates a tables builder.
    #[must_use]
    pub fn builder() -> TablesBuilder {
        TablesBuilder::default()
    }

    /// A small fixed table set for tests and examples.
    #[must_use]
    pub fn for_testing() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>();
        Self {
            species: names(&[
                "Grip, Farmer Maggot's Dog",
                "Fang, Farmer Maggot's Dog",
                "cave spider",
                "kobold",
                "snaga",
            ]),
            artifacts: names(&["the Phial of Galadriel", "the Star of Elendil", "Narthanc"]),
            egos: names(&["of Resist Fire", "of Slay Evil", "of Speed"]),
            activations: names(&["ILLUMINATION", "FIRE_BOLT"]),
            races: names(&["Human", "Half-Elf", "Elf", "Hobbit", "Dwarf"]),
            classes: vec![
                ClassDef::new("Warrior", 0),
                ClassDef::new("Mage", 12),
                ClassDef::new("Priest", 10),
            ],
            kind_count: 40,
        }
    }

    /// Validates table invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        check_names(TableKind::Species, &self.species)?;
        check_names(TableKind::Artifact, &self.artifacts)?;
        check_names(TableKind::Ego, &self.egos)?;
        check_names(TableKind::Activation, &self.activations)?;
        check_names(TableKind::Race, &self.races)?;
        let class_names: Vec<&str> = self.classes.iter().map(|c| c.name.as_str()).collect();
        check_names(TableKind::Class, &class_names)?;
        check_len(TableKind::ObjectKind, self.kind_count)
    }

    /// Number of entries in `table`.
    #[must_use]
    pub fn len(&self, table: TableKind) -> usize {
        match table {
            TableKind::Species => self.species.len(),
            TableKind::Artifact => self.artifacts.len(),
            TableKind::Ego => self.egos.len(),
            TableKind::Activation => self.activations.len(),
            TableKind::Race => self.races.len(),
            TableKind::Class => self.classes.len(),
            TableKind::ObjectKind => self.kind_count,
        }
    }

    /// Returns `true` if `raw` is a valid id or index for `table`.
    ///
    /// For 1-based tables `0` is never valid; callers map it to "none"
    /// before asking.
    #[must_use]
    pub fn contains(&self, table: TableKind, raw: usize) -> bool {
        let len = self.len(table);
        if table.is_one_based() {
            (1..=len).contains(&raw)
        } else {
            raw < len
        }
    }

    #[must_use]
    pub fn species_name(&self, id: u16) -> Option<&str> {
        one_based(&self.species, usize::from(id))
    }

    #[must_use]
    pub fn artifact_name(&self, id: u8) -> Option<&str> {
        one_based(&self.artifacts, usize::from(id))
    }

    #[must_use]
    pub fn ego_name(&self, id: u8) -> Option<&str> {
        one_based(&self.egos, usize::from(id))
    }

    #[must_use]
    pub fn activation_name(&self, id: u16) -> Option<&str> {
        one_based(&self.activations, usize::from(id))
    }

    #[must_use]
    pub fn race_name(&self, index: u8) -> Option<&str> {
        self.races.get(usize::from(index)).map(String::as_str)
    }

    #[must_use]
    pub fn class(&self, index: u8) -> Option<&ClassDef> {
        self.classes.get(usize::from(index))
    }
}

fn one_based(list: &[String], id: usize) -> Option<&str> {
    id.checked_sub(1)
        .and_then(|i| list.get(i))
        .map(String::as_str)
}

fn check_len(table: TableKind, len: usize) -> SchemaResult<()> {
    let max = table.max_entries();
    if len > max {
        return Err(SchemaError::TableTooLarge { table, len, max });
    }
    Ok(())
}

fn check_names<S: AsRef<str>>(table: TableKind, names: &[S]) -> SchemaResult<()> {
    check_len(table, names.len())?;
    let mut seen = HashSet::new();
    for (index, name) in names.iter().enumerate() {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(SchemaError::EmptyName { table, index });
        }
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateName {
                table,
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// Builder for [`GameTables`].
#[derive(Debug, Default)]
pub struct TablesBuilder {
    tables: GameTables,
}

impl TablesBuilder {
    #[must_use]
    pub fn species<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.species = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn artifacts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.artifacts = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn egos<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.egos = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn activations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.activations = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn races<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.races = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a class definition.
    #[must_use]
    pub fn class(mut self, class: ClassDef) -> Self {
        self.tables.classes.push(class);
        self
    }

    #[must_use]
    pub const fn kind_count(mut self, count: usize) -> Self {
        self.tables.kind_count = count;
        self
    }

    /// Builds the tables after validation.
    pub fn build(self) -> SchemaResult<GameTables> {
        self.tables.validate()?;
        Ok(self.tables)
    }
}
