//! maskVerif code generation.
//!
//! Renders the evaluated program into the verification tool's procedure
//! format, byte-for-byte in the layout the downstream tool consumes:
//!
//! ```text
//! proc design:
//! \tinputs: secret_a[0:1], data_a[0:0]
//! \toutputs:
//! \trandoms: mask_0, mask_1 ;
//! \tt_0 := secret_a[0] + secret_a[1] ;
//! end
//! noglitch Probing design
//! ```
//!
//! Inputs keep first-seen share-group order, randoms keep mask table
//! order, instructions keep emission order. The trailing directive runs
//! probing analysis without glitch extension on the emitted procedure.

use crate::eval::Program;

/// Render the complete output document.
#[must_use]
pub fn render_program(program: &Program) -> String {
    let inputs = program
        .share_groups
        .iter()
        .map(|g| format!("{}[0:{}]", g.id, g.shares - 1))
        .collect::<Vec<_>>()
        .join(", ");
    let randoms = program.masks.join(", ");
    let body = program
        .instructions
        .iter()
        .map(|(target, expr)| format!("\t{target} := {expr} ;"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::new();
    out.push_str("proc design:\n");
    out.push_str(&format!("\tinputs: {inputs}\n"));
    out.push_str("\toutputs: \n");
    out.push_str(&format!("\trandoms: {randoms} ;\n"));
    out.push_str(&body);
    out.push_str("\nend\n");
    out.push_str("noglitch Probing design\n");
    out
}
