use crate::{cli::display::short_id, core::models::Item};

pub fn print_item_table(items: &[Item]) {
    for line in item_table_lines(items) {
        println!("{line}");
    }
}

fn item_table_lines(items: &[Item]) -> Vec<String> {
    let mut lines = vec![
        "ID        NAME                   ADDED       UPDATED".to_owned(),
        "----------------------------------------------------------".to_owned(),
    ];
    if items.is_empty() {
        lines.push("(no items)".to_owned());
    }
    for item in items {
        let id = short_id(&item.id);
        let name = truncate(&item.name, 22);
        let added = item
            .date_added
            .map_or_else(|| "-".to_owned(), |at| at.format("%Y-%m-%d").to_string());
        let updated = item
            .date_updated
            .map_or_else(|| "-".to_owned(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        lines.push(format!("{id:<8}  {name:<22} {added}  {updated}"));
    }
    lines
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }
    value.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
}
