//! Calculator command.

use console::style;

use ps_core::error::{PsError, PsResult};
use ps_services::screens::calculator::{Calculator, Key};

use crate::OutputFormat;

/// Expand one argument into key presses. Multi-digit numbers such as `12.5`
/// are pressed one character at a time.
fn parse_token(token: &str) -> PsResult<Vec<Key>> {
    if let Ok(key) = token.parse::<Key>() {
        return Ok(vec![key]);
    }
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return token.chars().map(|c| c.to_string().parse()).collect();
    }
    Err(PsError::validation(format!("unknown key: {token}")))
}

pub fn run(tokens: Vec<String>, steps: bool, format: OutputFormat) -> PsResult<()> {
    let keys = match tokens
        .iter()
        .map(|t| parse_token(t))
        .collect::<PsResult<Vec<Vec<Key>>>>()
    {
        Ok(keys) => keys.into_iter().flatten().collect::<Vec<_>>(),
        Err(e) if e.is_validation() => {
            eprintln!("  {} {e}", style("Error").red().bold());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut calc = Calculator::new();
    let mut trace = Vec::with_capacity(keys.len());
    for key in keys {
        calc.press(key);
        trace.push((key, calc.display().to_string()));
    }

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "display": calc.display(),
            "pendingOperator": calc.pending_operator().map(|op| op.symbol().to_string()),
            "pendingOperand": calc.pending_operand(),
            "steps": if steps {
                Some(trace.iter().map(|(_, d)| d.clone()).collect::<Vec<_>>())
            } else {
                None
            },
        })),
        OutputFormat::Text => {
            if steps {
                for (key, display) in &trace {
                    println!("  {:<6} {}", style(format!("{key:?}")).dim(), display);
                }
                println!();
            }
            println!("{}", style(calc.display()).bold());
            if let Some(op) = calc.pending_operator() {
                println!("  {} pending", style(op.symbol()).yellow());
            }
            Ok(())
        }
    }
}
