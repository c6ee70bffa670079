//! The player record and its companion tables.
//!
//! The main record is written in the `player` section. The level-up hit
//! point table and the spell state follow later in their own sections.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::{PY_MAX_LEVEL, STAT_MAX, TMD_MAX};
use schema::{GameTables, TableKind};
use wire::{read_counted, write_counted, CountWidth};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{ArrayKind, CodecError, CodecResult, CorruptReason, EncodeReason};
use crate::knowledge::check_size;

/// Current, maximum and birth values of each stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatBlock {
    pub max: [i16; STAT_MAX],
    pub cur: [i16; STAT_MAX],
    pub birth: [i16; STAT_MAX],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySlot {
    pub kind: u16,
    pub name: String,
}

/// The equipment slots available to the player's race.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    pub name: String,
    pub slots: Vec<BodySlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub died_from: String,
    pub history: String,
    /// 0-based race index.
    pub race: u8,
    /// 0-based class index.
    pub class: u8,
    pub name_suffix: u8,
    pub hitdie: u8,
    pub expfact: u8,
    pub age: i16,
    pub height: i16,
    pub weight: i16,
    pub stats: StatBlock,
    pub height_birth: i16,
    pub weight_birth: i16,
    pub gold_birth: u32,
    pub body: Body,
    pub gold: u32,
    pub max_exp: u32,
    pub exp: u32,
    pub exp_frac: u16,
    pub level: i16,
    pub mhp: i16,
    pub chp: i16,
    pub chp_frac: u16,
    pub msp: i16,
    pub csp: i16,
    pub csp_frac: u16,
    pub max_level: i16,
    pub max_depth: i16,
    pub unignoring: bool,
    pub deep_descent: i16,
    pub food: i16,
    pub energy: i16,
    pub word_recall: i16,
    pub confusing: u8,
    pub searching: bool,
    pub timed: [i16; TMD_MAX],
    pub total_energy: u32,
    pub resting_turn: u32,
    /// Hit points gained at each level.
    pub hp_table: Vec<i16>,
    /// One flag byte per class spell.
    pub spell_flags: Vec<u8>,
    /// Order in which spells were learned.
    pub spell_order: Vec<u8>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            name: String::new(),
            died_from: String::new(),
            history: String::new(),
            race: 0,
            class: 0,
            name_suffix: 0,
            hitdie: 0,
            expfact: 0,
            age: 0,
            height: 0,
            weight: 0,
            stats: StatBlock::default(),
            height_birth: 0,
            weight_birth: 0,
            gold_birth: 0,
            body: Body::default(),
            gold: 0,
            max_exp: 0,
            exp: 0,
            exp_frac: 0,
            level: 1,
            mhp: 0,
            chp: 0,
            chp_frac: 0,
            msp: 0,
            csp: 0,
            csp_frac: 0,
            max_level: 1,
            max_depth: 0,
            unignoring: false,
            deep_descent: 0,
            food: 0,
            energy: 0,
            word_recall: 0,
            confusing: 0,
            searching: false,
            timed: [0; TMD_MAX],
            total_energy: 0,
            resting_turn: 0,
            hp_table: Vec::new(),
            spell_flags: Vec::new(),
            spell_order: Vec::new(),
        }
    }
}

fn write_stats<W: Write + ?Sized>(
    values: &[i16; STAT_MAX],
    writer: &mut ByteWriter<'_, W>,
) -> CodecResult<()> {
    for &value in values {
        writer.write_i16(value)?;
    }
    Ok(())
}

fn read_stats<R: Read + ?Sized>(reader: &mut ByteReader<'_, R>) -> CodecResult<[i16; STAT_MAX]> {
    let mut values = [0; STAT_MAX];
    for value in &mut values {
        *value = reader.read_i16()?;
    }
    Ok(values)
}

pub fn encode_player<W: Write + ?Sized>(
    player: &Player,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    ctx.index(TableKind::Race, usize::from(player.race))?;
    ctx.index(TableKind::Class, usize::from(player.class))?;
    check_count(ctx.codec_limits.max_body_slots, player.body.slots.len())?;

    ctx.write_string(writer, &player.name)?;
    ctx.write_string(writer, &player.died_from)?;
    ctx.write_string(writer, &player.history)?;
    writer.write_u8(player.race)?;
    writer.write_u8(player.class)?;
    writer.write_u8(player.name_suffix)?;
    writer.write_u8(player.hitdie)?;
    writer.write_u8(player.expfact)?;
    writer.write_i16(player.age)?;
    writer.write_i16(player.height)?;
    writer.write_i16(player.weight)?;

    writer.write_u8(STAT_MAX as u8)?;
    write_stats(&player.stats.max, writer)?;
    write_stats(&player.stats.cur, writer)?;
    write_stats(&player.stats.birth, writer)?;
    writer.write_i16(player.height_birth)?;
    writer.write_i16(player.weight_birth)?;
    writer.write_i16(0)?;
    writer.write_u32(player.gold_birth)?;

    ctx.write_string(writer, &player.body.name)?;
    write_counted(writer, CountWidth::U16, &player.body.slots, |w, slot| {
        w.write_u16(slot.kind)?;
        ctx.write_string(w, &slot.name)?;
        Ok::<_, CodecError>(())
    })?;
    writer.write_u32(0)?;

    writer.write_u32(player.gold)?;
    writer.write_u32(player.max_exp)?;
    writer.write_u32(player.exp)?;
    writer.write_u16(player.exp_frac)?;
    writer.write_i16(player.level)?;
    writer.write_i16(player.mhp)?;
    writer.write_i16(player.chp)?;
    writer.write_u16(player.chp_frac)?;
    writer.write_i16(player.msp)?;
    writer.write_i16(player.csp)?;
    writer.write_u16(player.csp_frac)?;
    writer.write_i16(player.max_level)?;
    writer.write_i16(player.max_depth)?;
    writer.write_zeros(4 * 2 + 1)?;
    writer.write_bool(player.unignoring)?;
    writer.write_i16(player.deep_descent)?;
    writer.write_i16(player.food)?;
    writer.write_i16(player.energy)?;
    writer.write_i16(player.word_recall)?;
    writer.write_u8(player.confusing)?;
    writer.write_bool(player.searching)?;

    writer.write_u8(TMD_MAX as u8)?;
    for &timer in &player.timed {
        writer.write_i16(timer)?;
    }
    writer.write_u32(player.total_energy)?;
    writer.write_u32(player.resting_turn)?;
    writer.write_zeros(8 * 4)?;
    Ok(())
}

/// Reads the main player record. The hit point table and spells stay empty.
pub fn decode_player<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Player> {
    let mut player = Player {
        name: ctx.read_string(reader)?,
        died_from: ctx.read_string(reader)?,
        history: ctx.read_string(reader)?,
        ..Player::default()
    };
    player.race = reader.read_u8()?;
    ctx.index(TableKind::Race, usize::from(player.race))?;
    player.class = reader.read_u8()?;
    ctx.index(TableKind::Class, usize::from(player.class))?;
    player.name_suffix = reader.read_u8()?;
    player.hitdie = reader.read_u8()?;
    player.expfact = reader.read_u8()?;
    player.age = reader.read_i16()?;
    player.height = reader.read_i16()?;
    player.weight = reader.read_i16()?;

    check_size(reader, ArrayKind::Stats, STAT_MAX)?;
    player.stats = StatBlock {
        max: read_stats(reader)?,
        cur: read_stats(reader)?,
        birth: read_stats(reader)?,
    };
    player.height_birth = reader.read_i16()?;
    player.weight_birth = reader.read_i16()?;
    reader.skip(2)?;
    player.gold_birth = reader.read_u32()?;

    player.body.name = ctx.read_string(reader)?;
    player.body.slots = read_counted(
        reader,
        CountWidth::U16,
        ctx.codec_limits.max_body_slots,
        |r| {
            Ok::<_, CodecError>(BodySlot {
                kind: r.read_u16()?,
                name: ctx.read_string(r)?,
            })
        },
    )?;
    reader.skip(4)?;

    player.gold = reader.read_u32()?;
    player.max_exp = reader.read_u32()?;
    player.exp = reader.read_u32()?;
    player.exp_frac = reader.read_u16()?;
    player.level = reader.read_i16()?;
    player.mhp = reader.read_i16()?;
    player.chp = reader.read_i16()?;
    player.chp_frac = reader.read_u16()?;
    player.msp = reader.read_i16()?;
    player.csp = reader.read_i16()?;
    player.csp_frac = reader.read_u16()?;
    player.max_level = reader.read_i16()?;
    player.max_depth = reader.read_i16()?;
    reader.skip(4 * 2 + 1)?;
    player.unignoring = reader.read_bool()?;
    player.deep_descent = reader.read_i16()?;
    player.food = reader.read_i16()?;
    player.energy = reader.read_i16()?;
    player.word_recall = reader.read_i16()?;
    player.confusing = reader.read_u8()?;
    player.searching = reader.read_bool()?;

    check_size(reader, ArrayKind::PlayerTimed, TMD_MAX)?;
    for timer in &mut player.timed {
        *timer = reader.read_i16()?;
    }
    player.total_energy = reader.read_u32()?;
    player.resting_turn = reader.read_u32()?;
    reader.skip(8 * 4)?;
    Ok(player)
}

pub(crate) fn encode_hp_table<W: Write + ?Sized>(
    player: &Player,
    writer: &mut ByteWriter<'_, W>,
) -> CodecResult<()> {
    check_count(PY_MAX_LEVEL, player.hp_table.len())?;
    write_counted(writer, CountWidth::U16, &player.hp_table, |w, &hp| {
        Ok::<_, CodecError>(w.write_i16(hp)?)
    })
}

pub(crate) fn decode_hp_table<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
) -> CodecResult<Vec<i16>> {
    read_counted(reader, CountWidth::U16, PY_MAX_LEVEL, |r| {
        Ok::<_, CodecError>(r.read_i16()?)
    })
}

fn class_spells(tables: &GameTables, class: u8) -> Option<u16> {
    tables.class(class).map(|class| class.total_spells)
}

pub(crate) fn encode_spells<W: Write + ?Sized>(
    player: &Player,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    let expected = class_spells(ctx.tables, player.class).ok_or(EncodeReason::UnknownId {
        table: TableKind::Class,
        raw: i64::from(player.class),
    })?;
    for list in [&player.spell_flags, &player.spell_order] {
        if list.len() != usize::from(expected) {
            return Err(EncodeReason::SpellCountMismatch {
                expected,
                found: list.len(),
            }
            .into());
        }
    }
    writer.write_u16(expected)?;
    writer.write_bytes(&player.spell_flags)?;
    writer.write_bytes(&player.spell_order)?;
    Ok(())
}

/// Reads spell flags and order for a player of `class`.
pub(crate) fn decode_spells<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
    class: u8,
) -> CodecResult<(Vec<u8>, Vec<u8>)> {
    let expected = class_spells(ctx.tables, class).ok_or(CorruptReason::IdOutOfRange {
        table: TableKind::Class,
        raw: i64::from(class),
    })?;
    let found = reader.read_u16()?;
    if found != expected {
        return Err(CorruptReason::SpellCountMismatch { expected, found }.into());
    }
    let mut flags = vec![0; usize::from(found)];
    reader.read_into(&mut flags)?;
    let mut order = vec![0; usize::from(found)];
    reader.read_into(&mut order)?;
    Ok((flags, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{decode_all, encode, encode_unlimited, try_encode};

    fn mage() -> Player {
        let mut player = Player {
            name: "Elric".into(),
            history: "Born under a dark star.".into(),
            race: 2,
            class: 1,
            hitdie: 9,
            expfact: 130,
            age: 240,
            height: 78,
            weight: 160,
            gold: 512,
            exp: 900,
            max_exp: 900,
            level: 9,
            mhp: 40,
            chp: 33,
            msp: 12,
            csp: 4,
            max_level: 9,
            max_depth: 6,
            food: 5000,
            body: Body {
                name: "humanoid".into(),
                slots: vec![
                    BodySlot {
                        kind: 1,
                        name: "weapon".into(),
                    },
                    BodySlot {
                        kind: 5,
                        name: "body".into(),
                    },
                ],
            },
            ..Player::default()
        };
        player.stats.max = [18, 17, 10, 16, 12];
        player.stats.cur = [18, 15, 10, 16, 12];
        player.stats.birth = [17, 15, 10, 14, 12];
        player.timed[0] = 30;
        player.timed[TMD_MAX - 1] = -2;
        player
    }

    #[test]
    fn player_roundtrip() {
        let player = mage();
        let bytes = encode(|w, ctx| encode_player(&player, w, ctx));
        let (decoded, consumed) = decode_all(&bytes, decode_player);
        assert_eq!(decoded.unwrap(), player);
        assert_eq!(consumed, bytes.len() as u64);
    }

    #[test]
    fn unknown_race_is_unencodable() {
        let player = Player {
            race: 9,
            ..mage()
        };
        let err = try_encode(|w, ctx| encode_player(&player, w, ctx)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unencodable(EncodeReason::UnknownId {
                table: TableKind::Race,
                raw: 9
            })
        );
    }

    #[test]
    fn unknown_race_is_corrupt() {
        let mut bytes = encode(|w, ctx| encode_player(&mage(), w, ctx));
        // race follows the three strings
        let race_at = ["Elric", "", "Born under a dark star."]
            .iter()
            .map(|s| s.len() + 1)
            .sum::<usize>();
        assert_eq!(bytes[race_at], 2);
        bytes[race_at] = 9;
        let (decoded, _) = decode_all(&bytes, decode_player);
        assert_eq!(
            decoded.unwrap_err(),
            CodecError::Corrupt(CorruptReason::IdOutOfRange {
                table: TableKind::Race,
                raw: 9
            })
        );
    }

    #[test]
    fn hp_table_roundtrip() {
        let player = Player {
            hp_table: vec![10, 14, 19, 25],
            ..Player::default()
        };
        let bytes = encode(|w, _| encode_hp_table(&player, w));
        assert_eq!(&bytes[..2], &[4, 0]);
        let (decoded, _) = decode_all(&bytes, |r, _| decode_hp_table(r));
        assert_eq!(decoded.unwrap(), player.hp_table);
    }

    #[test]
    fn spells_follow_class() {
        let player = Player {
            spell_flags: (0..12).collect(),
            spell_order: vec![99; 12],
            ..mage()
        };
        let bytes = encode(|w, ctx| encode_spells(&player, w, ctx));
        assert_eq!(bytes.len(), 2 + 24);
        let (decoded, _) = decode_all(&bytes, |r, ctx| decode_spells(r, ctx, 1));
        assert_eq!(
            decoded.unwrap(),
            (player.spell_flags.clone(), player.spell_order.clone())
        );
    }

    #[test]
    fn spell_count_must_match_class() {
        let player = Player {
            spell_flags: vec![0; 3],
            spell_order: vec![0; 3],
            ..mage()
        };
        let err = try_encode(|w, ctx| encode_spells(&player, w, ctx)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unencodable(EncodeReason::SpellCountMismatch {
                expected: 12,
                found: 3
            })
        );

        // a warrior has no spells, so a mage's spell block does not fit
        let bytes = encode(|w, ctx| encode_spells(&mage_with_spells(), w, ctx));
        let (decoded, _) = decode_all(&bytes, |r, ctx| decode_spells(r, ctx, 0));
        assert_eq!(
            decoded.unwrap_err(),
            CodecError::Corrupt(CorruptReason::SpellCountMismatch {
                expected: 0,
                found: 12
            })
        );
    }

    fn mage_with_spells() -> Player {
        Player {
            spell_flags: vec![0; 12],
            spell_order: vec![0; 12],
            ..mage()
        }
    }

    #[test]
    fn too_many_body_slots_is_unencodable() {
        let mut player = mage();
        player.body.slots = vec![
            BodySlot {
                kind: 1,
                name: "ring".into(),
            };
            13
        ];
        let err = try_encode(|w, ctx| encode_player(&player, w, ctx)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unencodable(EncodeReason::CountExceeded {
                limit: 12,
                actual: 13
            })
        );

        let bytes = encode_unlimited(|w, ctx| encode_player(&player, w, ctx));
        let (decoded, _) = decode_all(&bytes, decode_player);
        assert!(decoded.unwrap_err().is_corrupt());
    }

    #[test]
    fn hp_table_longer_than_max_level_is_unencodable() {
        let player = Player {
            hp_table: vec![1; PY_MAX_LEVEL + 1],
            ..Player::default()
        };
        let err = try_encode(|w, _| encode_hp_table(&player, w)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Unencodable(EncodeReason::CountExceeded { .. })
        ));
    }
}
