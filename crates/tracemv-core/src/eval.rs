//! Symbolic evaluation of the cycle trace.
//!
//! One mutable context is threaded through the whole run:
//!
//! - **alias table** — symbol name to canonical reference; every operand is
//!   resolved through it (one step) before use, because alias values are
//!   themselves canonical at insertion time;
//! - **deletion set** — unmasked/irrelevant symbols; any instruction whose
//!   resolved operands touch it is itself deleted, transitively, and never
//!   emitted;
//! - **definition maps** — temporary and state slot numbers to their
//!   defining expressions (trace-wide, not per cycle: the upstream
//!   generator numbers symbols globally);
//! - **instruction list** — `(target, expression)` pairs in emission order.
//!
//! Ordering is load-bearing. Cycles run strictly in increasing index order
//! and lines in source order; aliasing and taint only ever refer backward,
//! so a single forward pass suffices and nothing is revisited. After the
//! walk, a post-pass re-resolves each instruction target through the final
//! alias table (a target may have been aliased away after being recorded).
//!
//! Gate semantics over `{0, 1}`: `xor` is field addition, `and` is field
//! multiplication, `or` is folded onto the same multiplication upstream and
//! preserved verbatim here, and `not` passes its operand through (the
//! complement is not represented). A gate reducing to a single operand
//! never emits an instruction; it only extends the alias table.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};
use tracemv_syntax::{instr, GateOp, Instr, Operand, ParsedTrace, ShareGroup};

use crate::error::TranspileError;
use crate::expr::Expr;

/// Evaluation options.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Explicit cycle count; inferred as `max cycle index + 1` when unset.
    pub cycles: Option<u32>,
    /// Keep the legacy state-assignment aliasing: when a state slot is
    /// assigned while already aliased, the stale alias is copied under an
    /// `f_<temp>` key instead of being left alone. The `f_*` keys are never
    /// consulted, so emitted output is identical under both settings; the
    /// flag exists for internal-state parity with older toolchains.
    pub legacy_state_alias: bool,
}

/// Evaluated program, ready for code generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    /// `(target, expression)` in emission order, targets canonicalized.
    pub instructions: Vec<(String, Expr)>,
    /// Share groups in first-seen order.
    pub share_groups: Vec<ShareGroup>,
    /// Mask names in first-seen order.
    pub masks: Vec<String>,
}

/// Walk all cycles of a parsed trace and build the [`Program`].
///
/// # Errors
/// Fatal on: an unparsable body line, a cycle index missing below the
/// cycle count, an empty trace without an explicit count, or a reference
/// to a symbol that was never defined, aliased, or deleted.
pub fn evaluate(parsed: &ParsedTrace, opts: &Options) -> Result<Program, TranspileError> {
    let num_cycles = match opts.cycles {
        Some(n) => n,
        None => parsed
            .raw
            .max_cycle()
            .map(|m| m + 1)
            .ok_or(TranspileError::EmptyTrace)?,
    };

    let mut ctx = Context::seeded(parsed, opts.legacy_state_alias);
    for cycle in 0..num_cycles {
        let lines = parsed
            .raw
            .cycles
            .get(&cycle)
            .ok_or(TranspileError::MissingCycle { cycle })?;
        debug!(cycle, lines = lines.len(), "evaluating cycle");
        for line in lines {
            if instr::is_comment(line) {
                continue;
            }
            let ins = instr::parse_line(line)
                .map_err(|source| TranspileError::Instruction { cycle, source })?;
            ctx.step(cycle, &ins)?;
        }
    }

    let alias_count = ctx.aliases.len();
    let tainted = ctx.deleted.len();
    let program = ctx.finish(parsed);
    info!(
        cycles = num_cycles,
        emitted = program.instructions.len(),
        aliases = alias_count,
        tainted,
        "trace evaluated"
    );
    Ok(program)
}

/// The single mutable evaluation context.
struct Context {
    aliases: HashMap<String, String>,
    deleted: HashSet<String>,
    temp_defs: HashMap<u32, Expr>,
    state_defs: HashMap<u32, Expr>,
    instructions: Vec<(String, Expr)>,
    legacy_state_alias: bool,
}

impl Context {
    fn seeded(parsed: &ParsedTrace, legacy_state_alias: bool) -> Self {
        Self {
            aliases: parsed.debug.aliases.iter().cloned().collect(),
            deleted: parsed.debug.deleted.iter().cloned().collect(),
            temp_defs: HashMap::new(),
            state_defs: HashMap::new(),
            instructions: Vec::new(),
            legacy_state_alias,
        }
    }

    fn step(&mut self, cycle: u32, ins: &Instr) -> Result<(), TranspileError> {
        match ins {
            Instr::Gate { target, op, args } => self.gate(cycle, *target, *op, args),
            Instr::Assign { state, temp } => self.assign(cycle, *state, *temp),
            Instr::Rename { temp, state } => self.rename(cycle, *temp, *state),
        }
    }

    fn gate(
        &mut self,
        cycle: u32,
        target: u32,
        op: GateOp,
        args: &[Operand],
    ) -> Result<(), TranspileError> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            resolved.push(self.resolve_operand(cycle, *arg)?);
        }

        let target_name = format!("t_{target}");
        if resolved.iter().any(|r| self.deleted.contains(r)) {
            // Transitive taint: the gate is never recorded.
            self.deleted.insert(target_name);
            return Ok(());
        }

        let expr = match op {
            GateOp::Xor => Expr::sum(resolved[0].clone(), resolved[1].clone()),
            GateOp::And | GateOp::Or => Expr::product(resolved[0].clone(), resolved[1].clone()),
            GateOp::Not => Expr::reference(resolved[0].clone()),
        };
        self.temp_defs.insert(target, expr.clone());

        if let Some(name) = expr.as_ref_name() {
            // Identity: alias the target instead of emitting, resolving the
            // operand once more in case it is itself an alias key by now.
            let res = self.resolve(name);
            self.aliases.insert(target_name, res);
        } else {
            self.instructions.push((target_name, expr));
        }
        Ok(())
    }

    fn assign(&mut self, cycle: u32, state: u32, temp: u32) -> Result<(), TranspileError> {
        let state_name = format!("s_{state}");
        let temp_name = format!("t_{temp}");

        if self.aliases.contains_key(&state_name) {
            // The slot already names a terminal; the binding stays as-is.
            if self.legacy_state_alias {
                let stale = self.aliases[&state_name].clone();
                self.aliases.insert(format!("f_{temp}"), stale);
            }
            return Ok(());
        }

        if self.deleted.contains(&temp_name) {
            // Taint follows the value into the state slot.
            self.deleted.insert(state_name);
            return Ok(());
        }

        let def = self
            .temp_defs
            .get(&temp)
            .cloned()
            .ok_or_else(|| TranspileError::UndefinedSymbol {
                cycle,
                symbol: format!("t{temp}"),
            })?;
        self.state_defs.insert(state, def);
        let res = self.resolve(&temp_name);
        self.aliases.insert(state_name, res);
        Ok(())
    }

    fn rename(&mut self, cycle: u32, temp: u32, state: u32) -> Result<(), TranspileError> {
        let state_name = format!("s_{state}");
        if !self.state_known(state, &state_name) {
            return Err(TranspileError::UndefinedSymbol { cycle, symbol: format!("s[{state}]") });
        }
        self.temp_defs.insert(temp, Expr::reference(state_name.clone()));
        let res = self.resolve(&state_name);
        self.aliases.insert(format!("t_{temp}"), res);
        Ok(())
    }

    /// Canonical name of a gate operand, resolved one step through the
    /// alias table. Referencing an unknown symbol is fatal.
    fn resolve_operand(&self, cycle: u32, arg: Operand) -> Result<String, TranspileError> {
        let (name, known, written) = match arg {
            Operand::Temp(n) => {
                let name = format!("t_{n}");
                let known = self.temp_defs.contains_key(&n)
                    || self.aliases.contains_key(&name)
                    || self.deleted.contains(&name);
                (name, known, format!("t{n}"))
            }
            Operand::State(n) => {
                let name = format!("s_{n}");
                (name.clone(), self.state_known(n, &name), format!("s[{n}]"))
            }
        };
        if !known {
            return Err(TranspileError::UndefinedSymbol { cycle, symbol: written });
        }
        Ok(self.resolve(&name))
    }

    fn state_known(&self, state: u32, name: &str) -> bool {
        self.aliases.contains_key(name)
            || self.deleted.contains(name)
            || self.state_defs.contains_key(&state)
    }

    fn resolve(&self, name: &str) -> String {
        self.aliases.get(name).cloned().unwrap_or_else(|| name.to_owned())
    }

    /// Post-pass: canonicalize instruction targets through the final alias
    /// table and package the program.
    fn finish(self, parsed: &ParsedTrace) -> Program {
        let aliases = &self.aliases;
        let instructions = self
            .instructions
            .into_iter()
            .map(|(target, expr)| {
                let target = aliases.get(&target).cloned().unwrap_or(target);
                (target, expr)
            })
            .collect();
        Program {
            instructions,
            share_groups: parsed.debug.share_groups.clone(),
            masks: parsed.debug.masks.clone(),
        }
    }
}
