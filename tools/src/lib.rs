//! Introspection and debugging tools for delve save files.
//!
//! This crate provides utilities for looking inside a save:
//!
//! - Print the section layout and the byte span of each section
//! - Summarize the decoded world as JSON or as text
//! - Write a small sample save to experiment with
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the codec wrote.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use bytestream::ByteReader;
use codec::{
    load_savefile, Chunk, CodecLimits, CodecResult, Dungeon, GearItem, GearSlot,
    HistoryEntry, Item, KillMemory, LoadedSave, Loc, Message, Monster, SectionKind, SpeciesId,
    Store, Trap, World,
};
use glob::Pattern;
use schema::GameTables;
use serde::Serialize;
use wire::{decode_header, FileHeader, Limits};

/// Layout of one decoded save.
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub header: FileHeader,
    pub description: String,
    pub sections: Vec<SectionReport>,
    /// Bytes after the last section.
    pub trailing_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionReport {
    pub kind: SectionKind,
    pub version: u8,
    pub start: u64,
    pub byte_len: u64,
    /// Number of records in the section, where it holds a list.
    pub entries: Option<usize>,
}

/// Decodes `bytes` and reports where each section sits.
pub fn inspect_savefile(
    bytes: &[u8],
    tables: &GameTables,
    limits: &Limits,
    codec_limits: &CodecLimits,
) -> CodecResult<InspectReport> {
    let mut src = bytes;
    let header = decode_header(&mut ByteReader::new(&mut src))?;

    let mut src = bytes;
    let loaded = load_savefile(&mut src, tables, limits, codec_limits)?;
    let end = loaded.sections.last().map_or(0, |span| span.end);
    let sections = loaded
        .sections
        .iter()
        .map(|span| SectionReport {
            kind: span.kind,
            version: span.version,
            start: span.start,
            byte_len: span.len(),
            entries: entry_count(&loaded.world, span.kind),
        })
        .collect();

    Ok(InspectReport {
        header,
        description: loaded.description,
        sections,
        trailing_bytes: (bytes.len() as u64).saturating_sub(end),
    })
}

fn entry_count(world: &World, kind: SectionKind) -> Option<usize> {
    let level = world.dungeon.as_ref();
    match kind {
        SectionKind::Messages => Some(world.messages.len()),
        SectionKind::MonsterMemory => Some(world.kills.len()),
        SectionKind::ObjectMemory => Some(world.kinds.len()),
        SectionKind::Quests => Some(world.quests.len()),
        SectionKind::Artifacts => Some(world.artifacts.len()),
        SectionKind::PlayerHp => Some(world.player.hp_table.len()),
        SectionKind::PlayerSpells => Some(world.player.spell_flags.len()),
        SectionKind::Gear => Some(world.gear.carried.len() + world.gear.known.len()),
        SectionKind::Stores => Some(world.stores.len()),
        SectionKind::Objects => {
            level.map(|d| item_count(&d.level) + item_count(&d.known))
        }
        SectionKind::Monsters => level.map(|d| d.level.monsters.len() + d.known.monsters.len()),
        SectionKind::Traps => level.map(|d| trap_count(&d.level) + trap_count(&d.known)),
        SectionKind::Chunks => Some(world.chunks.len()),
        SectionKind::History => Some(world.history.len()),
        _ => None,
    }
}

fn item_count(chunk: &Chunk) -> usize {
    chunk.objects.values().map(Vec::len).sum()
}

fn trap_count(chunk: &Chunk) -> usize {
    chunk.traps.values().map(Vec::len).sum()
}

/// Renders an inspect report as aligned text.
#[must_use]
pub fn format_inspect_report(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "version: {}", report.header.version);
    let _ = writeln!(out, "description: {}", report.description);
    let _ = writeln!(out, "sections:");
    for section in &report.sections {
        let entries = section
            .entries
            .map(|count| format!("{count} entries"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:<14} v{} @{:<6} {:>6} bytes  {}",
            section.kind.name(),
            section.version,
            section.start,
            section.byte_len,
            entries
        );
    }
    if report.trailing_bytes > 0 {
        let _ = writeln!(out, "trailing: {} bytes", report.trailing_bytes);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorldSummary {
    pub description: String,
    pub player: PlayerSummary,
    pub dead: bool,
    pub turn: i32,
    pub level: Option<LevelSummary>,
    pub gear: GearSummary,
    pub messages: usize,
    pub kills: usize,
    pub stores: Vec<StoreSummary>,
    pub stored_levels: Vec<String>,
    pub history: Vec<HistorySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub race: Option<String>,
    pub class: Option<String>,
    pub level: i16,
    pub exp: u32,
    pub gold: u32,
    pub hp: i16,
    pub max_hp: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub name: String,
    pub depth: u16,
    pub height: u16,
    pub width: u16,
    pub player: (u8, u8),
    pub objects: usize,
    pub monsters: Vec<String>,
    pub traps: usize,
    /// Objects the player remembers seeing.
    pub known_objects: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GearSummary {
    pub equipped: usize,
    pub pack: usize,
    pub known: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub owner: u8,
    pub stock: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub turn: i32,
    pub depth: i16,
    pub artifact: Option<String>,
    pub event: String,
}

/// Condenses a loaded save into the fields worth printing.
#[must_use]
pub fn summarize(loaded: &LoadedSave, tables: &GameTables) -> WorldSummary {
    let world = &loaded.world;
    let player = &world.player;
    let count = |slot: GearSlot| {
        world
            .gear
            .carried
            .iter()
            .filter(|entry| entry.slot == slot)
            .count()
    };

    WorldSummary {
        description: loaded.description.clone(),
        player: PlayerSummary {
            name: player.name.clone(),
            race: tables.race_name(player.race).map(str::to_owned),
            class: tables.class(player.class).map(|class| class.name.clone()),
            level: player.level,
            exp: player.exp,
            gold: player.gold,
            hp: player.chp,
            max_hp: player.mhp,
        },
        dead: world.misc.is_dead,
        turn: world.misc.turn,
        level: world
            .dungeon
            .as_ref()
            .map(|dungeon| level_summary(dungeon, tables)),
        gear: GearSummary {
            equipped: count(GearSlot::Equipped),
            pack: count(GearSlot::Pack),
            known: world.gear.known.len(),
        },
        messages: world.messages.len(),
        kills: world.kills.len(),
        stores: world
            .stores
            .iter()
            .map(|store| StoreSummary {
                owner: store.owner,
                stock: store.stock.len(),
            })
            .collect(),
        stored_levels: world.chunks.iter().map(|chunk| chunk.name.clone()).collect(),
        history: world
            .history
            .iter()
            .map(|entry| HistorySummary {
                turn: entry.turn,
                depth: entry.depth,
                artifact: entry
                    .artifact
                    .and_then(|id| tables.artifact_name(id.raw()))
                    .map(str::to_owned),
                event: entry.event.clone(),
            })
            .collect(),
    }
}

fn level_summary(dungeon: &Dungeon, tables: &GameTables) -> LevelSummary {
    let level = &dungeon.level;
    LevelSummary {
        name: level.name.clone(),
        depth: dungeon.depth,
        height: level.height(),
        width: level.width(),
        player: (dungeon.player.y, dungeon.player.x),
        objects: item_count(level),
        monsters: level
            .monsters
            .iter()
            .map(|monster| {
                tables
                    .species_name(monster.species.raw())
                    .map_or_else(|| format!("#{}", monster.species.raw()), str::to_owned)
            })
            .collect(),
        traps: trap_count(level),
        known_objects: item_count(&dungeon.known),
    }
}

/// Renders a summary as plain text.
#[must_use]
pub fn format_summary_pretty(summary: &WorldSummary) -> String {
    let mut out = String::new();
    let player = &summary.player;
    let _ = writeln!(out, "{}", summary.description);
    let _ = writeln!(
        out,
        "{}: level {} {} {}, {}/{} hp, {} gold, {} exp",
        player.name,
        player.level,
        player.race.as_deref().unwrap_or("?"),
        player.class.as_deref().unwrap_or("?"),
        player.hp,
        player.max_hp,
        player.gold,
        player.exp
    );
    let _ = writeln!(out, "turn {}", summary.turn);
    match &summary.level {
        Some(level) => {
            let _ = writeln!(
                out,
                "level {:?} at DL{} ({}x{}), player at {:?}",
                level.name, level.depth, level.height, level.width, level.player
            );
            let _ = writeln!(
                out,
                "  {} objects ({} remembered), {} traps",
                level.objects, level.known_objects, level.traps
            );
            for monster in &level.monsters {
                let _ = writeln!(out, "  monster: {monster}");
            }
        }
        None if summary.dead => {
            let _ = writeln!(out, "dead, no current level");
        }
        None => {}
    }
    let _ = writeln!(
        out,
        "gear: {} equipped, {} in pack, {} known",
        summary.gear.equipped, summary.gear.pack, summary.gear.known
    );
    let _ = writeln!(
        out,
        "{} messages, {} species killed, {} stores, {} stored levels",
        summary.messages,
        summary.kills,
        summary.stores.len(),
        summary.stored_levels.len()
    );
    for entry in &summary.history {
        let _ = writeln!(out, "  [{}] DL{}: {}", entry.turn, entry.depth, entry.event);
    }
    out
}

/// A small living character on a populated level.
///
/// Built against [`GameTables::for_testing`].
#[must_use]
pub fn sample_world() -> World {
    let mut world = World::default();
    world.rng.value = 0x5eed;
    world.rng.state[0] = 1;
    world.messages = vec![
        Message::new("Welcome to the dungeon.", 0),
        Message::new("You hear a door open.", 1),
    ];
    world.kills = vec![KillMemory {
        name: "kobold".into(),
        kills: 3,
    }];

    let player = &mut world.player;
    player.name = "Sam".into();
    player.race = 3;
    player.class = 2;
    player.level = 6;
    player.max_level = 6;
    player.exp = 210;
    player.max_exp = 210;
    player.mhp = 48;
    player.chp = 48;
    player.gold = 120;
    player.hp_table = vec![10, 8, 9, 7, 8, 6];
    player.spell_flags = vec![0; 10];
    player.spell_order = vec![99; 10];

    world.misc.turn = 4_500;
    world.gear.carried = vec![
        GearItem::equipped(Item::new(21, 2)),
        GearItem::in_pack(Item::new(80, 1)),
    ];
    world.gear.known = world.gear.carried.clone();
    world.stores = vec![Store {
        owner: 0,
        stock: vec![Item::new(75, 1)],
    }];

    let mut level = Chunk::new("Blank", 11, 20);
    for y in 0..11 {
        for x in 0..20 {
            let wall = y == 0 || y == 10 || x == 0 || x == 19;
            level.set_feature(Loc::new(y, x), if wall { 21 } else { 1 });
        }
    }
    let mut known = level.clone();
    level.place_item(Item::new(75, 2).at(Loc::new(4, 4)));
    level.place_trap(Trap::new(1, Loc::new(8, 15)));
    if let Some(kobold) = SpeciesId::new(4) {
        level.monsters.push(Monster::new(kobold, Loc::new(5, 12)));
    }
    known.place_item(Item::new(75, 2).at(Loc::new(4, 4)));
    world.dungeon = Some(Dungeon {
        depth: 2,
        daycount: 0,
        player: Loc::new(3, 3),
        level,
        known,
    });

    world.history = vec![HistoryEntry {
        turn: 1,
        event: "Began the quest to destroy Morgoth.".into(),
        ..HistoryEntry::default()
    }];
    world
}

/// A save found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Which saves in a directory to look at, and in what order.
#[derive(Debug, Clone, Default)]
pub struct SaveSelection {
    /// Matched against the file name and against the whole path.
    pub pattern: Option<Pattern>,
    pub largest_first: bool,
    pub limit: Option<usize>,
}

impl SaveSelection {
    /// Regular files in `dir` that pass the pattern, by name unless
    /// `largest_first` is set. Subdirectories are not searched.
    pub fn select(&self, dir: &Path) -> io::Result<Vec<SaveFile>> {
        let mut saves = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let path = entry.path();
            if !self.wants(&path) {
                continue;
            }
            saves.push(SaveFile {
                path,
                bytes: metadata.len(),
            });
        }

        if self.largest_first {
            saves.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));
        } else {
            saves.sort_by(|a, b| a.path.cmp(&b.path));
        }
        if let Some(limit) = self.limit {
            saves.truncate(limit);
        }
        Ok(saves)
    }

    fn wants(&self, path: &Path) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        pattern.matches_path(path)
            || path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::save_savefile;

    fn sample_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        save_savefile(
            &sample_world(),
            &GameTables::for_testing(),
            &Limits::default(),
            &CodecLimits::default(),
            &mut bytes,
        )
        .unwrap();
        bytes
    }

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("delve-tools-{name}-{}", std::process::id()));
            let _ = std::fs::remove_dir_all(&dir);
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn file(&self, name: &str, len: usize) {
            std::fs::write(self.0.join(name), vec![0u8; len]).unwrap();
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn names(saves: &[SaveFile]) -> Vec<String> {
        saves
            .iter()
            .map(|save| save.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn selection_orders_filters_and_limits() {
        let dir = ScratchDir::new("select");
        dir.file("bilbo.sav", 30);
        dir.file("frodo.sav", 50);
        dir.file("notes.txt", 90);
        dir.file("sam.sav", 10);
        std::fs::create_dir(dir.0.join("old.sav")).unwrap();

        let all = SaveSelection::default().select(&dir.0).unwrap();
        assert_eq!(names(&all), ["bilbo.sav", "frodo.sav", "notes.txt", "sam.sav"]);

        let saves = SaveSelection {
            pattern: Some(Pattern::new("*.sav").unwrap()),
            ..SaveSelection::default()
        };
        let found = saves.select(&dir.0).unwrap();
        assert_eq!(names(&found), ["bilbo.sav", "frodo.sav", "sam.sav"]);
        assert_eq!(found[1].bytes, 50);

        let biggest = SaveSelection {
            largest_first: true,
            limit: Some(2),
            ..saves
        };
        assert_eq!(names(&biggest.select(&dir.0).unwrap()), ["frodo.sav", "bilbo.sav"]);
    }

    #[test]
    fn selection_ties_break_by_name() {
        let dir = ScratchDir::new("ties");
        dir.file("b.sav", 8);
        dir.file("a.sav", 8);
        let selection = SaveSelection {
            largest_first: true,
            ..SaveSelection::default()
        };
        assert_eq!(names(&selection.select(&dir.0).unwrap()), ["a.sav", "b.sav"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = ScratchDir::new("missing");
        let gone = dir.0.join("nope");
        assert!(SaveSelection::default().select(&gone).is_err());
    }

    #[test]
    fn inspect_lists_every_section() {
        let bytes = sample_bytes();
        let report = inspect_savefile(
            &bytes,
            &GameTables::for_testing(),
            &Limits::default(),
            &CodecLimits::default(),
        )
        .unwrap();
        assert_eq!(report.header.version, wire::VERSION);
        assert_eq!(report.sections.len(), SectionKind::ALL.len());
        assert_eq!(report.trailing_bytes, 0);
        let total: u64 = report.sections.iter().map(|s| s.byte_len).sum();
        assert_eq!(total + wire::HEADER_SIZE as u64, bytes.len() as u64);

        let monsters = report
            .sections
            .iter()
            .find(|s| s.kind == SectionKind::Monsters)
            .unwrap();
        assert_eq!(monsters.entries, Some(1));

        let text = format_inspect_report(&report);
        assert!(text.contains("monster memory"));
        assert!(text.contains("Sam, L6 Hobbit Priest, at DL2"));
    }

    #[test]
    fn summary_names_things() {
        let tables = GameTables::for_testing();
        let bytes = sample_bytes();
        let mut src = bytes.as_slice();
        let loaded =
            load_savefile(&mut src, &tables, &Limits::default(), &CodecLimits::default()).unwrap();
        let summary = summarize(&loaded, &tables);
        assert_eq!(summary.player.race.as_deref(), Some("Hobbit"));
        assert_eq!(summary.gear.equipped, 1);
        assert_eq!(summary.gear.pack, 1);
        let level = summary.level.as_ref().unwrap();
        assert_eq!(level.monsters, vec!["kobold".to_string()]);
        assert_eq!(level.objects, 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["player"]["name"], "Sam");
        assert_eq!(json["stores"][0]["stock"], 1);

        let text = format_summary_pretty(&summary);
        assert!(text.contains("monster: kobold"));
    }

    #[test]
    fn dead_summary_has_no_level() {
        let tables = GameTables::for_testing();
        let mut world = sample_world();
        world.misc.is_dead = true;
        world.player.died_from = "a kobold".into();
        let mut bytes = Vec::new();
        save_savefile(
            &world,
            &tables,
            &Limits::default(),
            &CodecLimits::default(),
            &mut bytes,
        )
        .unwrap();
        let mut src = bytes.as_slice();
        let loaded =
            load_savefile(&mut src, &tables, &Limits::default(), &CodecLimits::default()).unwrap();
        let summary = summarize(&loaded, &tables);
        assert!(summary.dead);
        assert!(summary.level.is_none());
        assert!(format_summary_pretty(&summary).contains("dead, no current level"));
    }
}
