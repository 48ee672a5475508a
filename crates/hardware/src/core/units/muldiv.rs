//! Multiply/Divide Unit.
//!
//! MULT/MULTU and DIV/DIVU write HI and LO in the cycle they execute, then hold the
//! unit busy for a fixed number of cycles. While busy, MFHI/MFLO/MTHI/MTLO wait in
//! execute; a new multiply or divide is accepted and restarts the countdown. The countdown is
//! decremented once at the start of every execute evaluation, so a MULT executing at
//! cycle N unblocks a dependent MFHI at cycle N + latency.
//!
//! Division by zero does not trap: HI and LO are both set to 0.

/// Busy countdown and HI/LO result computation.
#[derive(Clone, Debug, Default)]
pub struct MulDivUnit {
    busy: u32,
    multiply_latency: u32,
    divide_latency: u32,
}

impl MulDivUnit {
    /// Creates an idle unit with the given latencies.
    pub const fn new(multiply_latency: u32, divide_latency: u32) -> Self {
        Self {
            busy: 0,
            multiply_latency,
            divide_latency,
        }
    }

    /// Decrements the busy countdown by one cycle, saturating at zero.
    pub fn tick(&mut self) {
        self.busy = self.busy.saturating_sub(1);
    }

    /// Returns `true` while a multiply or divide is still in flight.
    pub const fn is_busy(&self) -> bool {
        self.busy > 0
    }

    /// Remaining busy cycles.
    pub const fn remaining(&self) -> u32 {
        self.busy
    }

    /// Starts a multiply.
    ///
    /// # Returns
    ///
    /// `(hi, lo)` of the 64-bit product.
    pub fn multiply(&mut self, a: u32, b: u32, signed: bool) -> (u32, u32) {
        self.busy = self.multiply_latency;
        let product = if signed {
            (i64::from(a as i32) * i64::from(b as i32)) as u64
        } else {
            u64::from(a) * u64::from(b)
        };
        ((product >> 32) as u32, product as u32)
    }

    /// Starts a divide.
    ///
    /// # Returns
    ///
    /// `(hi, lo)` = `(remainder, quotient)`, or `(0, 0)` when `b` is zero.
    pub fn divide(&mut self, a: u32, b: u32, signed: bool) -> (u32, u32) {
        self.busy = self.divide_latency;
        if b == 0 {
            return (0, 0);
        }
        if signed {
            let (a, b) = (a as i32, b as i32);
            (a.wrapping_rem(b) as u32, a.wrapping_div(b) as u32)
        } else {
            (a % b, a / b)
        }
    }
}
