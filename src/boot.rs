//! # Multiboot-1 info block
//!
//! Only what the renderer needs: the `flags` word, the memory counters when
//! present, and the linear framebuffer descriptor (flag bit 12).
//! All fields are little-endian at fixed offsets.

use bitflags::bitflags;
use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::io;
use thiserror::Error;
use tracing::info;

use crate::renderer::SurfaceInfo;

bitflags! {
    /// Which optional parts of the info block the boot loader filled in.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MultibootFlags: u32 {
        const MEMORY       = 1 << 0;
        const BOOT_DEVICE  = 1 << 1;
        const CMDLINE      = 1 << 2;
        const MODULES      = 1 << 3;
        const AOUT_SYMS    = 1 << 4;
        const ELF_SECTIONS = 1 << 5;
        const MEMORY_MAP   = 1 << 6;
        const DRIVES       = 1 << 7;
        const CONFIG_TABLE = 1 << 8;
        const LOADER_NAME  = 1 << 9;
        const APM_TABLE    = 1 << 10;
        const VBE          = 1 << 11;
        const FRAMEBUFFER  = 1 << 12;
    }
}

const OFF_MEM_LOWER: usize = 4;
const OFF_FRAMEBUFFER: usize = 88;
/// addr(8) pitch(4) width(4) height(4) bpp(1) type(1)
const FRAMEBUFFER_END: usize = OFF_FRAMEBUFFER + 22;

/// Framebuffer `type` byte for direct RGB.
pub const FB_TYPE_RGB: u8 = 1;

#[derive(Error, Debug)]
pub enum BootInfoError {
    #[error("boot info is {got} bytes, need at least {need}")]
    Truncated { got: usize, need: usize },

    #[error("boot loader did not provide a framebuffer (flags {0:#x})")]
    NoFramebuffer(u32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parsed info block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootInfo {
    pub flags: MultibootFlags,
    /// KiB below 1 MiB and above 1 MiB, when `MEMORY` is set.
    pub memory_kib: Option<(u32, u32)>,
    pub framebuffer_addr: u64,
    pub pitch: u32,
    pub width: u32,
    pub height: u32,
    pub bpp: u8,
    pub fb_type: u8,
}

impl BootInfo {
    pub fn parse(bytes: &[u8]) -> Result<Self, BootInfoError> {
        let need = |n: usize| {
            if bytes.len() < n {
                Err(BootInfoError::Truncated { got: bytes.len(), need: n })
            } else {
                Ok(())
            }
        };

        need(4)?;
        let raw_flags = (&bytes[..4]).read_u32::<LE>()?;
        let flags = MultibootFlags::from_bits_truncate(raw_flags);

        let memory_kib = if flags.contains(MultibootFlags::MEMORY) {
            need(OFF_MEM_LOWER + 8)?;
            let mut rd = &bytes[OFF_MEM_LOWER..];
            Some((rd.read_u32::<LE>()?, rd.read_u32::<LE>()?))
        } else {
            None
        };

        if !flags.contains(MultibootFlags::FRAMEBUFFER) {
            return Err(BootInfoError::NoFramebuffer(raw_flags));
        }
        need(FRAMEBUFFER_END)?;

        let mut rd = &bytes[OFF_FRAMEBUFFER..FRAMEBUFFER_END];
        Ok(Self {
            flags,
            memory_kib,
            framebuffer_addr: rd.read_u64::<LE>()?,
            pitch: rd.read_u32::<LE>()?,
            width: rd.read_u32::<LE>()?,
            height: rd.read_u32::<LE>()?,
            bpp: rd.read_u8()?,
            fb_type: rd.read_u8()?,
        })
    }

    /// Geometry to hand to [`Framebuffer::new`](crate::renderer::Framebuffer::new).
    pub fn surface(&self) -> SurfaceInfo {
        SurfaceInfo {
            pitch: self.pitch,
            width: self.width,
            height: self.height,
            bpp: self.bpp,
        }
    }

    /// The boot banner, as structured fields.
    pub fn log(&self) {
        info!(
            addr = format_args!("{:#x}", self.framebuffer_addr),
            pitch = self.pitch,
            width = self.width,
            height = self.height,
            bpp = self.bpp,
            fb_type = self.fb_type,
            "framebuffer debug"
        );
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn block(flags: u32, w: u32, h: u32, bpp: u8) -> Vec<u8> {
        let mut b = vec![0u8; FRAMEBUFFER_END];
        (&mut b[0..4]).write_u32::<LE>(flags).unwrap();
        (&mut b[4..8]).write_u32::<LE>(639).unwrap();
        (&mut b[8..12]).write_u32::<LE>(130_048).unwrap();
        let mut fb = &mut b[OFF_FRAMEBUFFER..];
        fb.write_u64::<LE>(0xFD00_0000).unwrap();
        fb.write_u32::<LE>(w * 4).unwrap();
        fb.write_u32::<LE>(w).unwrap();
        fb.write_u32::<LE>(h).unwrap();
        fb.write_u8(bpp).unwrap();
        fb.write_u8(FB_TYPE_RGB).unwrap();
        b
    }

    #[test]
    fn parses_framebuffer_descriptor() {
        let flags = (MultibootFlags::MEMORY | MultibootFlags::FRAMEBUFFER).bits();
        let info = BootInfo::parse(&block(flags, 1024, 768, 32)).unwrap();
        assert_eq!(info.memory_kib, Some((639, 130_048)));
        assert_eq!(info.framebuffer_addr, 0xFD00_0000);
        assert_eq!(
            info.surface(),
            SurfaceInfo { pitch: 4096, width: 1024, height: 768, bpp: 32 }
        );
        assert_eq!(info.fb_type, FB_TYPE_RGB);
    }

    #[test]
    fn memory_counters_are_optional() {
        let info = BootInfo::parse(&block(MultibootFlags::FRAMEBUFFER.bits(), 8, 8, 32)).unwrap();
        assert_eq!(info.memory_kib, None);
    }

    #[test]
    fn missing_framebuffer_flag() {
        let err = BootInfo::parse(&block(MultibootFlags::MEMORY.bits(), 8, 8, 32)).unwrap_err();
        assert!(matches!(err, BootInfoError::NoFramebuffer(0x1)));
    }

    #[test]
    fn short_blocks_are_truncated() {
        let err = BootInfo::parse(&[1, 0]).unwrap_err();
        assert!(matches!(err, BootInfoError::Truncated { got: 2, need: 4 }));

        let b = block(MultibootFlags::FRAMEBUFFER.bits(), 8, 8, 32);
        let err = BootInfo::parse(&b[..100]).unwrap_err();
        assert!(matches!(err, BootInfoError::Truncated { got: 100, need: 110 }));
    }

    #[test]
    fn other_depths_parse_but_framebuffer_rejects_them() {
        let info = BootInfo::parse(&block(MultibootFlags::FRAMEBUFFER.bits(), 8, 8, 16)).unwrap();
        let mut mem = vec![0; 64];
        assert!(crate::renderer::Framebuffer::new(&mut mem, info.surface()).is_err());
    }
}
