use crate::error::CompileResult;
use crate::pipeline::{Pass, PassContext};
use crate::rule_tree::{print_node, Node};

/// Prints each top-level rule and at-rule as its own stylesheet fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractSheets;

impl Pass for ExtractSheets {
  fn name(&self) -> &'static str {
    "extract-sheets"
  }

  fn run(&self, nodes: &mut Vec<Node>, ctx: &mut PassContext<'_>) -> CompileResult<()> {
    for node in nodes.iter() {
      match node {
        Node::Declaration(declaration) => {
          tracing::debug!(property = %declaration.property, "skipping top-level declaration");
        }
        _ => ctx.push_sheet(print_node(node)),
      }
    }
    Ok(())
  }
}
