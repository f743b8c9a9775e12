use std::collections::HashSet;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use fieldmap_model::{
    ConfidenceLevel, ConfidenceThresholds, MappingConfiguration, NodeType, SchemaNode, join_path,
};

use crate::commands::MapOutcome;

pub fn print_map_summary(outcome: &MapOutcome) {
    let config = &outcome.config;
    println!("Source: {}", outcome.source_path.display());
    println!("Target: {}", outcome.target_path.display());
    println!("Strategy: {:?}, oracle: {}", outcome.strategy, outcome.oracle);
    println!("{}", rules_table(config));
    println!(
        "Overall confidence: {:.2} ({} rules)",
        config.overall_confidence(),
        config.len()
    );
    if let Some(levels) = level_line(config) {
        println!("{levels}");
    }

    let unmapped_source = unmapped_paths(
        &outcome.source,
        config.rules().iter().map(|r| r.source_path.as_str()),
    );
    let unmapped_target = unmapped_paths(
        &outcome.target,
        config.rules().iter().map(|r| r.target_path.as_str()),
    );
    if !unmapped_source.is_empty() || !unmapped_target.is_empty() {
        println!();
        println!("Unmapped fields:");
        println!("{}", unmapped_table(&unmapped_source, &unmapped_target));
    }
}

pub fn rules_table(config: &MappingConfiguration) -> Table {
    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Transformation"),
        header_cell("Confidence"),
        header_cell("Level"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for rule in config.rules() {
        let level = thresholds.categorize(rule.confidence_score);
        table.add_row(vec![
            Cell::new(&rule.source_path),
            Cell::new(&rule.target_path),
            Cell::new(rule.transformation.as_str()),
            Cell::new(format!("{:.2}", rule.confidence_score)).fg(level_color(level)),
            level_cell(level),
        ]);
    }
    table
}

/// Leaf paths of `root` that no rule refers to, in document order.
pub fn unmapped_paths<'a>(
    root: &SchemaNode,
    mapped: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mapped: HashSet<&str> = mapped.into_iter().collect();
    root.leaf_paths()
        .into_iter()
        .filter(|path| !mapped.contains(path.as_str()))
        .collect()
}

/// Every node below `root` as `(path, type)`, parents before children.
pub fn schema_rows(root: &SchemaNode) -> Vec<(String, NodeType)> {
    fn walk(node: &SchemaNode, ancestor: &str, rows: &mut Vec<(String, NodeType)>) {
        let path = join_path(ancestor, node.name());
        rows.push((path.clone(), node.node_type()));
        for child in node.children() {
            walk(child, &path, rows);
        }
    }

    let mut rows = Vec::new();
    for child in root.children() {
        walk(child, "", &mut rows);
    }
    rows
}

pub fn print_schema_table(root: &SchemaNode) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Path"), header_cell("Type")]);
    apply_table_style(&mut table);
    for (path, node_type) in schema_rows(root) {
        let type_cell = if node_type.is_container() {
            Cell::new(node_type).fg(Color::Blue)
        } else {
            Cell::new(node_type)
        };
        table.add_row(vec![Cell::new(path), type_cell]);
    }
    println!("Root: {}", root.node_type());
    println!("{table}");
}

fn unmapped_table(source: &[String], target: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Source"), header_cell("Target")]);
    apply_table_style(&mut table);
    for row in 0..source.len().max(target.len()) {
        table.add_row(vec![path_or_dash(source.get(row)), path_or_dash(target.get(row))]);
    }
    table
}

fn level_line(config: &MappingConfiguration) -> Option<String> {
    let counts = config.count_by_level(&ConfidenceThresholds::default());
    if counts.is_empty() {
        return None;
    }
    let parts: Vec<String> = counts
        .iter()
        .rev()
        .map(|(level, count)| format!("{}: {count}", level.label()))
        .collect();
    Some(format!("Levels: {}", parts.join(", ")))
}

fn level_cell(level: Option<ConfidenceLevel>) -> Cell {
    match level {
        Some(level) => Cell::new(level.label()).fg(level_color(Some(level))),
        None => dim_cell("-"),
    }
}

fn level_color(level: Option<ConfidenceLevel>) -> Color {
    match level {
        Some(ConfidenceLevel::High) => Color::Green,
        Some(ConfidenceLevel::Medium) => Color::Yellow,
        Some(ConfidenceLevel::Low) => Color::Red,
        None => Color::DarkGrey,
    }
}

fn path_or_dash(path: Option<&String>) -> Cell {
    match path {
        Some(path) => Cell::new(path),
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use fieldmap_model::MappingRule;

    use super::*;

    fn sample_tree() -> SchemaNode {
        SchemaNode::object(
            "",
            vec![
                SchemaNode::leaf("id", NodeType::Number),
                SchemaNode::array(
                    "tags",
                    Some(SchemaNode::leaf("item", NodeType::String)),
                ),
                SchemaNode::object("meta", vec![SchemaNode::leaf("created", NodeType::String)]),
            ],
        )
    }

    #[test]
    fn unmapped_paths_skip_mapped_leaves() {
        let unmapped = unmapped_paths(&sample_tree(), ["id", "meta.created"]);
        assert_eq!(unmapped, vec!["tags.item".to_string()]);
    }

    #[test]
    fn schema_rows_list_every_node() {
        let rows = schema_rows(&sample_tree());
        let paths: Vec<&str> = rows.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, vec!["id", "tags", "tags.item", "meta", "meta.created"]);
        assert_eq!(rows[1].1, NodeType::Array);
    }

    #[test]
    fn level_line_lists_highest_first() {
        let config = MappingConfiguration::from_rules(
            vec![
                MappingRule::direct("a", "a", 1.0),
                MappingRule::direct("b", "b", 0.85),
                MappingRule::direct("c", "c", 0.65),
                MappingRule::direct("d", "d", 0.3),
            ],
            "test",
        );
        assert_eq!(
            level_line(&config).as_deref(),
            Some("Levels: High: 1, Medium: 1, Low: 1")
        );
        assert_eq!(level_line(&MappingConfiguration::empty("test")), None);
    }

    #[test]
    fn rules_table_has_one_row_per_rule() {
        let config = MappingConfiguration::from_rules(
            vec![
                MappingRule::direct("first_name", "firstName", 1.0),
                MappingRule::direct("email", "emailAddress", 0.59),
            ],
            "test",
        );
        let table = rules_table(&config);
        assert_eq!(table.row_count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("firstName"));
        assert!(rendered.contains("0.59"));
    }
}
