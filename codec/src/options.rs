//! Option values and the message log.

use std::io::{Read, Write};

use bytestream::{ByteReader, ByteWriter};
use wire::{read_counted, read_until_sentinel, write_counted, write_terminated, CountWidth};

use crate::context::{check_count, DecodeContext, EncodeContext};
use crate::error::{CodecError, CodecResult, EncodeReason};

/// Number of most recent messages kept in a save.
pub const MESSAGE_CAP: usize = 80;

/// One named on/off option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    pub name: String,
    pub value: bool,
}

impl OptionValue {
    #[must_use]
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub delay_factor: u8,
    pub hitpoint_warn: u8,
    pub lazymove_delay: u16,
    /// Named options in the order they are written.
    pub values: Vec<OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: u16,
}

impl Message {
    #[must_use]
    pub fn new(text: impl Into<String>, kind: u16) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

pub(crate) fn encode_options<W: Write + ?Sized>(
    options: &Options,
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    check_count(ctx.codec_limits.max_options, options.values.len())?;
    writer.write_u8(options.delay_factor)?;
    writer.write_u8(options.hitpoint_warn)?;
    writer.write_u16(options.lazymove_delay)?;
    write_terminated(
        writer,
        &options.values,
        |w, option| {
            if option.name.is_empty() {
                return Err(EncodeReason::EmptyOptionName.into());
            }
            ctx.write_string(w, &option.name)?;
            w.write_bool(option.value)?;
            Ok::<_, CodecError>(())
        },
        |w| ctx.write_string(w, ""),
    )
}

pub(crate) fn decode_options<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Options> {
    let delay_factor = reader.read_u8()?;
    let hitpoint_warn = reader.read_u8()?;
    let lazymove_delay = reader.read_u16()?;
    let values = read_until_sentinel(reader, ctx.codec_limits.max_options, |r| {
        let name = ctx.read_string(r)?;
        if name.is_empty() {
            return Ok(None);
        }
        let value = r.read_bool()?;
        Ok::<_, CodecError>(Some(OptionValue { name, value }))
    })?;
    Ok(Options {
        delay_factor,
        hitpoint_warn,
        lazymove_delay,
        values,
    })
}

/// Writes the newest [`MESSAGE_CAP`] messages, oldest first.
pub(crate) fn encode_messages<W: Write + ?Sized>(
    messages: &[Message],
    writer: &mut ByteWriter<'_, W>,
    ctx: &EncodeContext<'_>,
) -> CodecResult<()> {
    let kept = &messages[messages.len().saturating_sub(MESSAGE_CAP)..];
    check_count(ctx.codec_limits.max_messages, kept.len())?;
    write_counted(writer, CountWidth::U16, kept, |w, message| {
        ctx.write_string(w, &message.text)?;
        w.write_u16(message.kind)?;
        Ok::<_, CodecError>(())
    })
}

pub(crate) fn decode_messages<R: Read + ?Sized>(
    reader: &mut ByteReader<'_, R>,
    ctx: &DecodeContext<'_>,
) -> CodecResult<Vec<Message>> {
    read_counted(reader, CountWidth::U16, ctx.codec_limits.max_messages, |r| {
        Ok::<_, CodecError>(Message {
            text: ctx.read_string(r)?,
            kind: r.read_u16()?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{decode_all, encode, try_encode};

    #[test]
    fn options_end_with_empty_name() {
        let options = Options {
            delay_factor: 40,
            hitpoint_warn: 3,
            lazymove_delay: 0,
            values: vec![
                OptionValue::new("rogue_like_commands", false),
                OptionValue::new("use_sound", true),
            ],
        };
        let bytes = encode(|w, ctx| encode_options(&options, w, ctx));
        let expected: Vec<u8> = [
            &[40, 3, 0, 0][..],
            b"rogue_like_commands\0",
            &[0],
            b"use_sound\0",
            &[1],
            &[0],
        ]
        .concat();
        assert_eq!(bytes, expected);
        let (decoded, consumed) = decode_all(&bytes, decode_options);
        assert_eq!(decoded.unwrap(), options);
        assert_eq!(consumed, bytes.len() as u64);
    }

    #[test]
    fn empty_option_name_is_unencodable() {
        let options = Options {
            values: vec![OptionValue::new("", true)],
            ..Options::default()
        };
        let err = try_encode(|w, ctx| encode_options(&options, w, ctx)).unwrap_err();
        assert_eq!(err, CodecError::Unencodable(EncodeReason::EmptyOptionName));
    }

    #[test]
    fn messages_keep_most_recent() {
        let messages: Vec<Message> = (0..100)
            .map(|i| Message::new(format!("message {i}"), i))
            .collect();
        let bytes = encode(|w, ctx| encode_messages(&messages, w, ctx));
        assert_eq!(&bytes[..2], &[80, 0]);
        let (decoded, _) = decode_all(&bytes, decode_messages);
        let decoded = decoded.unwrap();
        assert_eq!(decoded.len(), MESSAGE_CAP);
        assert_eq!(decoded[0].text, "message 20");
        assert_eq!(decoded[79], Message::new("message 99", 99));
    }

    #[test]
    fn short_log_is_kept_whole() {
        let messages = vec![Message::new("Welcome to the dungeon.", 0)];
        let bytes = encode(|w, ctx| encode_messages(&messages, w, ctx));
        let (decoded, _) = decode_all(&bytes, decode_messages);
        assert_eq!(decoded.unwrap(), messages);
    }

    #[test]
    fn too_many_options_is_unencodable() {
        let options = Options {
            values: (0..17).map(|i| OptionValue::new(format!("opt_{i}"), true)).collect(),
            ..Options::default()
        };
        let err = try_encode(|w, ctx| encode_options(&options, w, ctx)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unencodable(EncodeReason::CountExceeded {
                limit: 16,
                actual: 17
            })
        );
    }

    #[test]
    fn long_message_is_unencodable() {
        let messages = vec![Message::new("z".repeat(200), 0)];
        let err = try_encode(|w, ctx| encode_messages(&messages, w, ctx)).unwrap_err();
        assert_eq!(
            err,
            CodecError::Unencodable(EncodeReason::StringTooLong { len: 200, max: 128 })
        );
    }
}
