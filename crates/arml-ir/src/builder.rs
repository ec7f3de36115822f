//! Per-instruction statement builder.

use crate::expr::Expr;
use crate::stmt::{Label, SideEffect, Stmt};

/// Append-only buffer for one instruction's statements.
///
/// Created fresh per translation with a capacity hint; the only mutation is
/// append, and the emitted order is preserved exactly. Temporaries and labels
/// allocated through the builder are unique within its lifetime, which keeps
/// ids collision-free across concurrent translations.
pub struct StmtBuilder {
    stmts: Vec<Stmt>,
    temps: u32,
    labels: u32,
}

impl StmtBuilder {
    /// Create a builder expecting roughly `hint` statements.
    pub fn with_capacity(hint: usize) -> Self {
        Self {
            stmts: Vec::with_capacity(hint),
            temps: 0,
            labels: 0,
        }
    }

    /// Append a statement.
    pub fn emit(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// Allocate a fresh temporary of the given width.
    pub fn tmp_var(&mut self, width: u32) -> Expr {
        let idx = self.temps;
        self.temps += 1;
        Expr::Temp { width, idx }
    }

    /// Allocate a fresh label with a symbolic name.
    pub fn label(&mut self, name: &'static str) -> Label {
        let index = self.labels;
        self.labels += 1;
        Label { name, index }
    }

    pub fn is_mark(&mut self, addr: u64, len: u32) {
        self.emit(Stmt::ISMark { addr, len });
    }

    pub fn ie_mark(&mut self, addr: u64) {
        self.emit(Stmt::IEMark { addr });
    }

    pub fn put(&mut self, dst: Expr, src: Expr) {
        self.emit(Stmt::put(dst, src));
    }

    pub fn store(&mut self, addr: Expr, value: Expr) {
        self.emit(Stmt::store(addr, value));
    }

    pub fn lmark(&mut self, label: Label) {
        self.emit(Stmt::LMark(label));
    }

    pub fn jmp(&mut self, label: Label) {
        self.emit(Stmt::Jmp(label));
    }

    pub fn cjmp(&mut self, cond: Expr, taken: Label, not_taken: Label) {
        self.emit(Stmt::cjmp(cond, taken, not_taken));
    }

    pub fn inter_jmp(&mut self, pc: Expr, target: Expr) {
        self.emit(Stmt::inter_jmp(pc, target));
    }

    pub fn side_effect(&mut self, effect: SideEffect) {
        self.emit(Stmt::SideEffect(effect));
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Convert to the final immutable statement sequence.
    pub fn finish(self) -> Vec<Stmt> {
        self.stmts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let mut b = StmtBuilder::with_capacity(4);
        b.is_mark(0x8000, 4);
        let t = b.tmp_var(32);
        b.put(t.clone(), Expr::num_u64(5, 32));
        b.ie_mark(0x8004);

        let stmts = b.finish();
        assert_eq!(stmts.len(), 3);
        assert!(matches!(stmts[0], Stmt::ISMark { addr: 0x8000, len: 4 }));
        assert!(matches!(stmts[1], Stmt::Put { .. }));
        assert!(matches!(stmts[2], Stmt::IEMark { addr: 0x8004 }));
    }

    #[test]
    fn test_temps_and_labels_are_unique() {
        let mut b = StmtBuilder::with_capacity(0);
        let t0 = b.tmp_var(32);
        let t1 = b.tmp_var(8);
        assert!(matches!(t0, Expr::Temp { idx: 0, width: 32 }));
        assert!(matches!(t1, Expr::Temp { idx: 1, width: 8 }));

        let l0 = b.label("pass");
        let l1 = b.label("pass");
        assert_ne!(l0, l1);
        assert_eq!(l0.name, l1.name);
    }
}
