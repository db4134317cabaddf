use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::visible_width;
use ansi_term::Colour;

/// ANSI colour for each audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "mark" => Colour::Green,
        "del" => Colour::Red,
        "edit" | "force" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "export" | "import" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            info("The log is empty.");
            return Ok(());
        }

        let rendered: Vec<(i64, String, String, String)> = entries
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);

                let target = truncate(&target, 40);
                let op_target = if target.is_empty() {
                    color_for_operation(&operation).paint(operation.as_str()).to_string()
                } else {
                    format!(
                        "{} ({})",
                        color_for_operation(&operation).paint(operation.as_str()),
                        target
                    )
                };

                (id, date, op_target, message)
            })
            .collect();

        let id_w = rendered
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rendered
            .iter()
            .map(|(_, d, ..)| d.len())
            .max()
            .unwrap_or(10);
        let op_w = rendered
            .iter()
            .map(|(_, _, op, _)| visible_width(op))
            .max()
            .unwrap_or(10);

        for (id, date, op_target, message) in rendered {
            // padding on the visible width, ANSI sequences excluded
            let padding = " ".repeat(op_w.saturating_sub(visible_width(&op_target)));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id, date, op_target, padding, message,
            );
        }

        Ok(())
    }
}
