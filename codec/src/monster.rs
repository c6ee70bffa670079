//! Monster records.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use schema::dims::{ELEM_MAX, MFLAG_SIZE, MON_TMD_MAX};
use wire::FlagSet;

use crate::context::{DecodeContext, EncodeContext};
use crate::error::{ArrayKind, CodecError, CodecResult, VersionedPart};
use crate::item::{
    decode_item_list, decode_live_item, encode_item, encode_item_list, Item, ObjectFlags,
};
use crate::types::{Loc, SpeciesId};

pub type MonsterFlags = FlagSet<MFLAG_SIZE>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub species: SpeciesId,
    pub loc: Loc,
    pub hp: i16,
    pub max_hp: i16,
    pub speed: u8,
    pub energy: u8,
    pub timed: [i16; MON_TMD_MAX],
    pub flags: MonsterFlags,
    /// Player properties this monster has learned about.
    pub known_pstate: ObjectFlags,
    pub known_resists: [i16; ELEM_MAX],
    /// The item this monster is disguised as.
    pub mimicked: Option<Item>,
    pub held: Vec<Item>,
}

impl Monster {
    #[must_use]
    pub fn new(species: SpeciesId, loc: Loc) -> Self {
        Self {
            species,
            loc,
            hp: 1,
            max_hp: 1,
            speed: 110,
            energy: 0,
            timed: [0; MON_TMD_MAX],
            flags: MonsterFlags::new(),
            known_pstate: ObjectFlags::new(),
            known_resists: [0; ELEM_MAX],
            mimicked: None,
            held: Vec::new(),
        }
    }
}

pub fn encode_monster<W: Write + ?Sized>(
    monster: &Monster,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    writer.write_i16(ctx.species(monster.species)?)?;
    writer.write_u8(monster.loc.y)?;
    writer.write_u8(monster.loc.x)?;
    writer.write_i16(monster.hp)?;
    writer.write_i16(monster.max_hp)?;
    writer.write_u8(monster.speed)?;
    writer.write_u8(monster.energy)?;

    writer.write_u8(MON_TMD_MAX as u8)?;
    for &timer in &monster.timed {
        writer.write_i16(timer)?;
    }
    monster.flags.write(writer)?;
    monster.known_pstate.write(writer)?;
    for &resist in &monster.known_resists {
        writer.write_i16(resist)?;
    }

    writer.write_bool(monster.mimicked.is_some())?;
    if let Some(item) = &monster.mimicked {
        encode_item(item, writer, ctx)?;
    }
    encode_item_list(writer, ctx, &monster.held)
}

pub fn decode_monster<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Monster> {
    let species = ctx.species(reader.read_i16()?)?;
    let loc = Loc::new(reader.read_u8()?, reader.read_u8()?);
    let hp = reader.read_i16()?;
    let max_hp = reader.read_i16()?;
    let speed = reader.read_u8()?;
    let energy = reader.read_u8()?;

    let declared = usize::from(reader.read_u8()?);
    if declared != MON_TMD_MAX {
        return Err(CodecError::version(
            VersionedPart::Array(ArrayKind::MonsterTimed),
            MON_TMD_MAX,
            declared,
        ));
    }
    let mut timed = [0; MON_TMD_MAX];
    for timer in &mut timed {
        *timer = reader.read_i16()?;
    }
    let flags = MonsterFlags::read(reader)?;
    let known_pstate = ObjectFlags::read(reader)?;
    let mut known_resists = [0; ELEM_MAX];
    for resist in &mut known_resists {
        *resist = reader.read_i16()?;
    }

    let mimicked = if reader.read_bool()? {
        Some(decode_live_item(reader, ctx)?)
    } else {
        None
    };
    let held = decode_item_list(reader, ctx)?;

    Ok(Monster {
        species,
        loc,
        hp,
        max_hp,
        speed,
        energy,
        timed,
        flags,
        known_pstate,
        known_resists,
        mimicked,
        held,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CorruptReason, EncodeReason};
    use crate::item::encode_item_sentinel;
    use crate::test_support::{decode_all, encode, try_encode};
    use schema::TableKind;

    fn kobold() -> Monster {
        let mut monster = Monster::new(SpeciesId::new(4).unwrap(), Loc::new(10, 22));
        monster.hp = 12;
        monster.max_hp = 15;
        monster.energy = 40;
        monster.timed[2] = 5;
        monster.flags.insert(1);
        monster.known_pstate.insert(20);
        monster.known_resists[3] = 1;
        monster
    }

    #[test]
    fn empty_held_list_is_one_sentinel() {
        let monster = kobold();
        let bytes = encode(|w, ctx| encode_monster(&monster, w, ctx));
        let sentinel = encode(|w, ctx| encode_item_sentinel(w, ctx));
        assert!(bytes.ends_with(&sentinel));
        // mimic presence byte sits right before the sentinel
        assert_eq!(bytes[bytes.len() - sentinel.len() - 1], 0);

        let (decoded, consumed) = decode_all(&bytes, decode_monster);
        let decoded = decoded.unwrap();
        assert!(decoded.held.is_empty());
        assert_eq!(decoded, monster);
        assert_eq!(consumed, bytes.len() as u64);
    }

    #[test]
    fn held_and_mimic_roundtrip() {
        let mut monster = kobold();
        monster.mimicked = Some(Item::new(7, 1));
        monster.held = vec![Item::new(30, 2), Item::new(31, 3)];
        let bytes = encode(|w, ctx| encode_monster(&monster, w, ctx));
        let (decoded, _) = decode_all(&bytes, decode_monster);
        assert_eq!(decoded.unwrap(), monster);
    }

    #[test]
    fn unknown_species_is_unencodable() {
        let monster = Monster::new(SpeciesId::new(99).unwrap(), Loc::default());
        let err = try_encode(|w, ctx| encode_monster(&monster, w, ctx)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unencodable(EncodeReason::UnknownId {
                table: TableKind::Species,
                raw: 99
            })
        );
    }

    #[test]
    fn held_item_with_unknown_ego_is_unencodable() {
        let mut monster = kobold();
        let mut loot = Item::new(30, 2);
        loot.ego = crate::types::EgoId::new(9);
        monster.held = vec![loot];
        let err = try_encode(|w, ctx| encode_monster(&monster, w, ctx)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Unencodable(EncodeReason::UnknownId { table: TableKind::Ego, raw: 9 })
        ));
    }

    #[test]
    fn unknown_species_is_corrupt() {
        let mut bytes = encode(|w, ctx| encode_monster(&kobold(), w, ctx));
        bytes[..2].copy_from_slice(&99i16.to_le_bytes());
        let (decoded, _) = decode_all(&bytes, decode_monster);
        assert_eq!(
            decoded.unwrap_err(),
            CodecError::Corrupt(CorruptReason::IdOutOfRange {
                table: TableKind::Species,
                raw: 99
            })
        );
    }

    #[test]
    fn timed_size_change_is_version_mismatch() {
        let mut bytes = encode(|w, ctx| encode_monster(&kobold(), w, ctx));
        // species, y, x, hp, maxhp, speed, energy
        bytes[10] = MON_TMD_MAX as u8 + 1;
        let (decoded, _) = decode_all(&bytes, decode_monster);
        assert!(decoded.unwrap_err().is_version_mismatch());
    }
}
