// src/hil.rs

//! Register-level view of a generated pipeline wrapped for
//! hardware-in-the-loop testing.
//!
//! The wrapper exposes one pipeline instance on a 32-bit bus. The host
//! uploads the source samples into two memory banks, selects an output
//! index, releases reset and polls for ready before reading the result.

use crate::common::{clog2, DftError, Result};
use crate::fixed::types::FixedFormat;
use crate::pipeline::PipelineSim;
use num_complex::Complex64;

/// Bit 0: reset request (write), bit 1: ready (read).
pub const DFT_CMD_STATUS: u32 = 0x000000;
/// Output selection index. Writing it also asserts reset.
pub const DFT_IDX: u32 = 0x000004;
/// Packed [`ConfigWord`], read only.
pub const DFT_CONFIG: u32 = 0x000008;
pub const DFT_REAL: u32 = 0x000010;
pub const DFT_IMAG: u32 = 0x000014;
/// Build identifier, read only.
pub const DFT_BUILD: u32 = 0x000100;
/// Real parts of the source samples, one 32-bit word per sample.
pub const SRC_REAL: u32 = 0x800000;
/// Imaginary parts of the source samples, one 32-bit word per sample.
pub const SRC_IMAG: u32 = 0xc00000;
/// End of the imaginary bank (24-bit address space).
const SRC_END: u32 = 0x1000000;

pub const CMD_RESET: u32 = 1 << 0;
pub const STATUS_READY: u32 = 1 << 1;

/// Contents of `DFT_CONFIG`: `samples << 16 | width << 8 | frac`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWord {
    pub samples: u32,
    pub width: u32,
    pub frac: u32,
}

impl ConfigWord {
    pub fn pack(self) -> u32 {
        ((self.samples & 0xffff) << 16) | ((self.width & 0xff) << 8) | (self.frac & 0xff)
    }

    pub fn unpack(word: u32) -> Self {
        Self {
            samples: (word >> 16) & 0xffff,
            width: (word >> 8) & 0xff,
            frac: word & 0xff,
        }
    }

    pub fn format(self) -> Result<FixedFormat> {
        FixedFormat::new(self.width, self.frac)
    }
}

/// A 32-bit register bus clocked together with the device behind it.
pub trait RegisterBus {
    fn read32(&mut self, addr: u32) -> u32;
    fn write32(&mut self, addr: u32, data: u32);
    /// Lets `clocks` clock cycles pass.
    fn wait(&mut self, clocks: u32);
}

/// Software stand-in for the wrapped hardware, backed by the cycle model.
#[derive(Debug, Clone)]
pub struct SoftDevice<'g> {
    sim: PipelineSim<'g>,
    build: u32,
}

impl<'g> SoftDevice<'g> {
    pub fn new(sim: PipelineSim<'g>, build: u32) -> Self {
        Self { sim, build }
    }

    pub fn config(&self) -> ConfigWord {
        let fmt = self.sim.graph().format();
        ConfigWord {
            samples: self.sim.graph().n() as u32,
            width: fmt.width(),
            frac: fmt.frac(),
        }
    }

    #[inline]
    pub fn sim(&self) -> &PipelineSim<'g> {
        &self.sim
    }

    /// Maps a source-bank address to (sample, is_imag).
    fn decode_src(&self, addr: u32) -> Option<(usize, bool)> {
        let (base, imag) = match addr {
            SRC_REAL..SRC_IMAG => (SRC_REAL, false),
            SRC_IMAG..SRC_END => (SRC_IMAG, true),
            _ => return None,
        };
        let k = ((addr - base) / 4) as usize;
        (k < self.sim.graph().n()).then_some((k, imag))
    }
}

impl RegisterBus for SoftDevice<'_> {
    fn read32(&mut self, addr: u32) -> u32 {
        let data = match addr {
            DFT_CMD_STATUS => {
                let mut status = 0;
                if self.sim.reset() {
                    status |= CMD_RESET;
                }
                if self.sim.ready() {
                    status |= STATUS_READY;
                }
                status
            }
            DFT_IDX => self.sim.index() as u32,
            DFT_CONFIG => self.config().pack(),
            DFT_REAL => self.sim.output().0 as u32,
            DFT_IMAG => self.sim.output().1 as u32,
            DFT_BUILD => self.build,
            _ => match self.decode_src(addr) {
                Some((k, imag)) => {
                    let (re, im) = self.sim.sample(k).unwrap_or_default();
                    (if imag { im } else { re }) as u32
                }
                None => 0,
            },
        };
        log::trace!("read32 {:#08x} -> {:#010x}", addr, data);
        data
    }

    fn write32(&mut self, addr: u32, data: u32) {
        log::trace!("write32 {:#08x} <- {:#010x}", addr, data);
        let n = self.sim.graph().n();
        let fmt = self.sim.graph().format();

        let result = match addr {
            DFT_CMD_STATUS => {
                self.sim.set_reset(data & CMD_RESET != 0);
                Ok(())
            }
            DFT_IDX => {
                self.sim.set_reset(true);
                // Only the low log2(N) bits reach the index port
                self.sim.set_index(data as usize & (n - 1))
            }
            _ => match self.decode_src(addr) {
                Some((k, imag)) => {
                    let (re, im) = self.sim.sample(k).unwrap_or_default();
                    let value = fmt.wrap(i64::from(data));
                    self.sim.set_sample(k, if imag { (re, value) } else { (value, im) })
                }
                None => Ok(()),
            },
        };
        if let Err(e) = result {
            log::warn!("write32 {:#08x} ignored: {}", addr, e);
        }
    }

    fn wait(&mut self, clocks: u32) {
        for _ in 0..clocks {
            self.sim.tick();
        }
    }
}

/// Host-side driver: uploads `src`, then computes every output index in turn.
///
/// Samples are quantized with the format the device reports in `DFT_CONFIG`;
/// results are returned as raw values sign-extended from that width.
pub fn run_transform<B: RegisterBus>(bus: &mut B, src: &[Complex64]) -> Result<Vec<(i64, i64)>> {
    let config = ConfigWord::unpack(bus.read32(DFT_CONFIG));
    let fmt = config.format()?;
    let n = config.samples as usize;
    if src.len() != n {
        return Err(DftError::SizeMismatch {
            expected: n,
            actual: src.len(),
        });
    }
    let build = bus.read32(DFT_BUILD);
    log::debug!("device build {:#x}: N={}, {}", build, n, fmt);

    for (k, sample) in src.iter().enumerate() {
        let offset = 4 * k as u32;
        bus.write32(SRC_REAL + offset, fmt.quantize(sample.re)? as u32);
        bus.write32(SRC_IMAG + offset, fmt.quantize(sample.im)? as u32);
    }

    let limit = 4 * u64::from(clog2(n)) + 8;
    let mut dst = Vec::with_capacity(n);
    for idx in 0..n {
        bus.write32(DFT_IDX, idx as u32);
        bus.wait(1);
        bus.write32(DFT_CMD_STATUS, 0);

        let mut clocks = 0;
        while bus.read32(DFT_CMD_STATUS) & STATUS_READY == 0 {
            if clocks >= limit {
                return Err(DftError::Stalled(limit));
            }
            bus.wait(1);
            clocks += 1;
        }

        let re = fmt.wrap(i64::from(bus.read32(DFT_REAL)));
        let im = fmt.wrap(i64::from(bus.read32(DFT_IMAG)));
        log::trace!("idx {} ready after {} clocks: ({}, {})", idx, clocks, re, im);
        dst.push((re, im));
    }
    Ok(dst)
}

#[cfg(test)]
#[path = "hil_tests.rs"]
mod tests;
