//! Savefile encoding and decoding for delve.
//!
//! This crate ties together bytestream, wire and schema: it defines the world
//! snapshot a save is made from, the record layout of every entity in it, and
//! the section orchestrator that writes and reads a whole file.
//!
//! # Features
//!
//! - Whole-file save and load ([`save_savefile`], [`load_savefile`])
//! - Per-entity record codecs for items, monsters, traps, stores and history
//! - RLE-compressed terrain with live and remembered copies of a level
//! - Configurable decode limits and unknown-id policy ([`CodecLimits`])
//!
//! # Design Principles
//!
//! - **Correctness first** - Encode then decode reproduces the world exactly.
//! - **Bounded decoding** - Every count, scan and string is capped by a limit.
//! - **No silent repair** - The first malformed byte aborts the load.

mod chunk;
mod context;
mod error;
mod gear;
mod history;
mod item;
mod knowledge;
mod limits;
mod monster;
mod options;
mod player;
mod rng;
mod savefile;
mod store;
mod trap;
mod types;
mod world;

#[cfg(test)]
mod test_support;

pub use chunk::{decode_chunk, encode_chunk, Chunk, DEFAULT_CHUNK_NAME};
pub use context::{DecodeContext, EncodeContext};
pub use error::{
    ArrayKind, CodecError, CodecResult, CorruptReason, EncodeReason, VersionedPart,
};
pub use gear::{Gear, GearItem, GearSlot, GEAR_EQUIPPED, GEAR_FINISHED, GEAR_PACK};
pub use history::{decode_history_entry, encode_history_entry, HistoryEntry, HistoryFlags};
pub use item::{
    decode_item, decode_item_list, decode_live_item, encode_item, encode_item_list,
    encode_item_sentinel, Brand, ElementInfo, IdentifyFlags, Item, ItemOrigin, ObjectFlags, Slay,
    Timing, ITEM_MARKER, ITEM_VERSION,
};
pub use knowledge::{
    ArtifactKnowledge, AutoInscription, EgoIgnore, IgnoreRules, ItemTypeFlags, KillMemory,
    KindKnowledge, Quest, KILLS_END,
};
pub use limits::{CodecLimits, UnknownIdPolicy};
pub use monster::{decode_monster, encode_monster, Monster, MonsterFlags};
pub use options::{Message, OptionValue, Options, MESSAGE_CAP};
pub use player::{decode_player, encode_player, Body, BodySlot, Player, StatBlock};
pub use rng::{RngState, RNG_PADDING_WORDS, RNG_STATE_WORDS};
pub use savefile::{
    load_savefile, save_savefile, LoadedSave, SaveSummary, SectionKind, SectionSpan,
    SECTION_VERSION,
};
pub use store::{decode_store, encode_store, Store};
pub use trap::{decode_trap, encode_trap, encode_trap_sentinel, Trap, TrapFlags};
pub use types::{ActivationId, ArtifactId, EgoId, Loc, SpeciesId};
pub use wire::Limits as WireLimits;
pub use world::{Dungeon, Misc, World};
