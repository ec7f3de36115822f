//! Translation context: architectural registers as IR variables.

use arml_ir::{Expr, Var};
use arml_isa::{OperatingMode, Register};
use rustc_hash::FxHashMap;

use crate::error::{LiftError, Result};

/// Read-only mapping from architectural registers to IR variables.
///
/// Built once and shared across translations; the variables are long-lived
/// handles, so expressions referring to the same register compare equal
/// across instructions.
pub struct ArmContext {
    vars: FxHashMap<Register, Var>,
    mode: OperatingMode,
}

impl ArmContext {
    pub fn new(mode: OperatingMode) -> Self {
        let mut vars =
            FxHashMap::with_capacity_and_hasher(Register::ALL.len(), Default::default());
        for (index, reg) in Register::ALL.iter().enumerate() {
            vars.insert(*reg, Var::new(reg.name(), index as u32, reg.width()));
        }
        Self { vars, mode }
    }

    /// The variable backing an architectural register.
    pub fn reg_var(&self, reg: Register) -> Result<Var> {
        self.vars
            .get(&reg)
            .copied()
            .ok_or(LiftError::InvalidRegister(reg.name()))
    }

    /// The register as an expression.
    pub fn reg(&self, reg: Register) -> Result<Expr> {
        Ok(Expr::var(self.reg_var(reg)?))
    }

    pub fn operating_mode(&self) -> OperatingMode {
        self.mode
    }
}

impl Default for ArmContext {
    fn default() -> Self {
        Self::new(OperatingMode::Arm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_handles_are_stable() {
        let ctx = ArmContext::default();
        let a = ctx.reg_var(Register::R3).unwrap();
        let b = ctx.reg_var(Register::R3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name, "R3");
        assert_eq!(a.width, 32);
    }

    #[test]
    fn test_vfp_widths() {
        let ctx = ArmContext::default();
        assert_eq!(ctx.reg_var(Register::S5).unwrap().width, 32);
        assert_eq!(ctx.reg_var(Register::D5).unwrap().width, 64);
    }

    #[test]
    fn test_distinct_registers_distinct_vars() {
        let ctx = ArmContext::default();
        assert_ne!(
            ctx.reg_var(Register::R0).unwrap(),
            ctx.reg_var(Register::R1).unwrap()
        );
    }
}
