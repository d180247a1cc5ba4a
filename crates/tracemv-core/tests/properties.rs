//! Generated-trace properties: determinism, acyclic emission, taint closure.

use std::collections::HashSet;

use proptest::prelude::*;
use tracemv_core::{eval, transpile_str, Options};

/// Assemble a single-cycle trace from a gate script. Operand values pick
/// among the debug slots and the temporaries defined so far, so every
/// generated trace is well-formed by construction.
fn build_trace(shares: u32, masks: u32, unmasked: u32, gates: &[(u8, u32, u32)]) -> String {
    let mut debug = Vec::new();
    for k in 0..shares {
        debug.push(format!("secret 0 share {k}"));
    }
    for m in 0..masks {
        debug.push(format!("mask {m}"));
    }
    for u in 0..unmasked {
        debug.push(format!("data {u} unmasked"));
    }
    let slots = u32::try_from(debug.len()).unwrap();

    let mut lines = Vec::new();
    for (i, (op, a, b)) in gates.iter().enumerate() {
        let i = u32::try_from(i).unwrap();
        let pick = |v: u32| {
            let v = v % (slots + i);
            if v < slots {
                format!("s[{v}]")
            } else {
                format!("t{}", v - slots)
            }
        };
        lines.push(match op % 4 {
            0 => format!("#define t{i} _xor({}, {})", pick(*a), pick(*b)),
            1 => format!("#define t{i} _and({}, {})", pick(*a), pick(*b)),
            2 => format!("#define t{i} _or({}, {})", pick(*a), pick(*b)),
            _ => format!("#define t{i} _not({})", pick(*a)),
        });
    }

    format!(
        "static void run_circuit_cycle_0(wtype_t* s)\n{{\n{}\n}}\n\nconst char* DEBUG_INFO[{}] = {{\n{}\n}};\n",
        lines.join("\n"),
        debug.len(),
        debug
            .iter()
            .map(|e| format!("    \"{e}\","))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn gate_script() -> impl Strategy<Value = Vec<(u8, u32, u32)>> {
    prop::collection::vec((0u8..4, any::<u32>(), any::<u32>()), 0..32)
}

proptest! {
    #[test]
    fn rerun_is_byte_identical(
        shares in 2u32..5,
        masks in 0u32..3,
        unmasked in 0u32..2,
        gates in gate_script(),
    ) {
        let text = build_trace(shares, masks, unmasked, &gates);
        let opts = Options::default();
        let a = transpile_str(&text, &opts).unwrap();
        let b = transpile_str(&text, &opts).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn emission_is_acyclic_and_taint_closed(
        shares in 2u32..5,
        masks in 0u32..3,
        unmasked in 0u32..2,
        gates in gate_script(),
    ) {
        let text = build_trace(shares, masks, unmasked, &gates);
        let parsed = tracemv_syntax::parse(&text).unwrap();
        let program = eval::evaluate(&parsed, &Options::default()).unwrap();

        // Terminals: share elements and masks. Every emitted expression may
        // only reference terminals or strictly earlier targets, and nothing
        // derived from an unmasked slot survives.
        let mut defined: HashSet<String> = HashSet::new();
        for g in &program.share_groups {
            for k in 0..g.shares {
                defined.insert(format!("{}[{k}]", g.id));
            }
        }
        defined.extend(program.masks.iter().cloned());

        for (target, expr) in &program.instructions {
            for r in expr.references() {
                prop_assert!(defined.contains(r), "forward or deleted reference: {}", r);
            }
            defined.insert(target.clone());
        }
    }

    #[test]
    fn identity_gates_never_emit(
        shares in 2u32..5,
        masks in 0u32..3,
        unmasked in 0u32..2,
        gates in gate_script(),
    ) {
        let text = build_trace(shares, masks, unmasked, &gates);
        let parsed = tracemv_syntax::parse(&text).unwrap();
        let program = eval::evaluate(&parsed, &Options::default()).unwrap();

        let binary = gates.iter().filter(|(op, _, _)| op % 4 != 3).count();
        prop_assert!(program.instructions.len() <= binary);
    }
}
