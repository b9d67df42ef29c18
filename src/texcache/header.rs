//! Config header parsing and validation.

use std::io::{Read, Seek};

use super::reader::FieldReader;
use super::structs::{ConfigFlags, InputKind};
use crate::error::{Error, Result};

/// Validated texture stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Raw config word
    pub config: ConfigFlags,
    /// Kind of stream, either requested or inferred from `config`
    pub kind: InputKind,
}

impl Header {
    /// Validates a config word against an optional requested input kind.
    ///
    /// Without a request the kind is inferred; a stream flagged as both kinds
    /// is treated as a hi-res cache.
    pub fn from_config(config: u32, requested: Option<InputKind>) -> Result<Self> {
        let flags = ConfigFlags::from_bits_retain(config);
        if !flags.is_texture_stream() {
            return Err(Error::UnsupportedContainerVariant { config });
        }

        let kind = match requested {
            Some(kind) if flags.contains(kind.flag()) => kind,
            Some(kind) => {
                return Err(Error::InputKindMismatch {
                    requested: kind,
                    config,
                })
            }
            None if flags.contains(ConfigFlags::FILE_HIRESTEXCACHE) => InputKind::Hires,
            None => InputKind::Tex,
        };

        Ok(Self {
            config: flags,
            kind,
        })
    }

    /// Returns one line per decoded config field and set single-bit option.
    pub fn describe(&self) -> Vec<String> {
        let flags = self.config;
        let mut lines = vec![
            format!(
                "smooth filter: {}, sharp filter: {}, enhancement: {}",
                flags.smooth_filter(),
                flags.sharp_filter(),
                flags.enhancement()
            ),
            format!(
                "compression: {}, hires textures: {}",
                flags.compression(),
                flags.hires_textures()
            ),
        ];
        // Multi-bit fields are covered above.
        lines.extend(
            flags
                .iter_names()
                .filter(|(_, f)| {
                    f.bits().count_ones() == 1 && !f.intersects(ConfigFlags::FILE_CACHE_MASK)
                })
                .map(|(name, _)| name.to_string()),
        );
        lines
    }
}

/// Reads and validates the config header at the current position.
pub fn parse_header<R: Read + Seek>(
    reader: &mut FieldReader<R>,
    requested: Option<InputKind>,
) -> Result<Header> {
    let config = reader.read_u32().map_err(Error::HeaderRead)?;
    let header = Header::from_config(config, requested)?;

    Ok(header)
}
