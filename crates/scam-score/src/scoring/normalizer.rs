use super::schema;
use super::table::{Cell, Column, NormalizedTable, RecordTable};
use tracing::debug;

/// Cleans a numeric-looking string.
///
/// Order: strip whitespace, swap comma decimal separators for periods, strip minus
/// signs, then parse. Anything that still fails to parse, or parses to a non-finite
/// value, yields `None`.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .filter(|ch| *ch != '-')
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn normalize_column_name(name: &str) -> String {
    name.replace('\u{feff}', "").trim().to_string()
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn parse_flag(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn gender_label(code: f64) -> Option<&'static str> {
    if code == schema::GENDER_CODE_MALE {
        Some("male")
    } else if code == schema::GENDER_CODE_FEMALE {
        Some("female")
    } else {
        None
    }
}

/// Types one text cell on its own: blank is missing, `true`/`false` are flags, text
/// that cleans to a number is a number, and anything else is a lower-cased label, or
/// the sentinel in a quantity column.
fn normalize_text(raw: &str, quantity: bool) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Missing;
    }
    if let Some(flag) = parse_flag(trimmed) {
        return Cell::Bool(flag);
    }

    match clean_numeric(trimmed) {
        Some(value) => Cell::Number(value),
        None if quantity => Cell::Missing,
        None => Cell::Text(normalize_label(trimmed)),
    }
}

fn normalize_gender(cell: Cell) -> Cell {
    let cell = match cell {
        Cell::Text(raw) => normalize_text(&raw, false),
        other => other,
    };

    match cell {
        Cell::Number(code) => match gender_label(code) {
            Some(label) => Cell::Text(label.to_string()),
            None => Cell::Number(code),
        },
        other => other,
    }
}

fn normalize_column(name: String, values: Vec<Cell>) -> Column {
    if schema::is_identifier(&name) {
        let values = values
            .into_iter()
            .map(|cell| match cell {
                Cell::Text(raw) if raw.trim().is_empty() => Cell::Missing,
                Cell::Text(raw) => Cell::Text(raw.trim().to_string()),
                other => other,
            })
            .collect();
        return Column { name, values };
    }

    if name.eq_ignore_ascii_case(schema::GENDER) {
        let values = values.into_iter().map(normalize_gender).collect();
        return Column { name, values };
    }

    let quantity = schema::is_numeric(&name);
    let mut unresolved = 0usize;
    let values = values
        .into_iter()
        .map(|cell| match cell {
            Cell::Text(raw) => {
                let normalized = normalize_text(&raw, quantity);
                if quantity && normalized == Cell::Missing && !raw.trim().is_empty() {
                    unresolved += 1;
                }
                normalized
            }
            other => other,
        })
        .collect();

    if unresolved > 0 {
        debug!(column = %name, unresolved, "numeric cells could not be resolved");
    }
    Column { name, values }
}

/// Repairs column naming noise and numeric-as-text cells across the whole table.
///
/// Every cell is typed on its own, so a record normalizes the same way whatever
/// else is in the batch. An unparseable value in a quantity column becomes
/// `Cell::Missing`.
pub fn normalize(table: RecordTable) -> NormalizedTable {
    let len = table.len();
    let columns = table
        .into_columns()
        .into_iter()
        .map(|(name, values)| normalize_column(normalize_column_name(&name), values))
        .collect();

    NormalizedTable::new(columns, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn clean_numeric_handles_locale_noise() {
        assert_eq!(clean_numeric(" 1 234,5 "), Some(1234.5));
        assert_eq!(clean_numeric("12,75"), Some(12.75));
        assert_eq!(clean_numeric("-42"), Some(42.0));
        assert_eq!(clean_numeric("3"), Some(3.0));
    }

    #[test]
    fn clean_numeric_rejects_garbage_and_non_finite() {
        assert_eq!(clean_numeric("abc"), None);
        assert_eq!(clean_numeric(""), None);
        assert_eq!(clean_numeric("1,2,3"), None);
        assert_eq!(clean_numeric("NaN"), None);
        assert_eq!(clean_numeric("inf"), None);
    }

    #[test]
    fn column_names_are_trimmed() {
        assert_eq!(normalize_column_name("  DTI3M \t"), "DTI3M");
        assert_eq!(normalize_column_name("\u{feff}ID"), "ID");
    }

    #[test]
    fn numeric_text_columns_resolve_or_fall_back_to_missing() {
        let mut table = RecordTable::new(vec![" overdueamount ".to_string()]);
        table.push_row(vec![text("1 000,50")]);
        table.push_row(vec![text("n/a")]);
        table.push_row(vec![text("20")]);
        table.push_row(vec![Cell::Missing]);

        let normalized = normalize(table);
        let column = normalized.column("overdueamount").expect("column kept");

        assert_eq!(column.name, "overdueamount");
        assert_eq!(
            column.values,
            vec![
                Cell::Number(1000.5),
                Cell::Missing,
                Cell::Number(20.0),
                Cell::Missing
            ]
        );
    }

    #[test]
    fn categorical_columns_are_lowercased_and_trimmed() {
        let mut table = RecordTable::new(vec!["NEGATIVESTATUS".to_string()]);
        table.push_row(vec![text(" Y ")]);
        table.push_row(vec![text("N")]);
        table.push_row(vec![text("  ")]);

        let normalized = normalize(table);
        let column = normalized.column("negativestatus").expect("column kept");

        assert_eq!(column.values, vec![text("y"), text("n"), Cell::Missing]);
    }

    #[test]
    fn numbers_pass_through_unchanged() {
        let mut table = RecordTable::new(vec!["AVG_BALANCE_3M".to_string()]);
        table.push_row(vec![Cell::Number(-250.0)]);

        let normalized = normalize(table);
        assert_eq!(
            normalized.column("AVG_BALANCE_3M").expect("column").values,
            vec![Cell::Number(-250.0)]
        );
    }

    #[test]
    fn gender_codes_map_to_labels() {
        let mut table = RecordTable::new(vec!["Gender".to_string()]);
        table.push_row(vec![text("1")]);
        table.push_row(vec![Cell::Number(2.0)]);
        table.push_row(vec![text(" Other ")]);

        let normalized = normalize(table);
        assert_eq!(
            normalized.column("gender").expect("column").values,
            vec![text("male"), text("female"), text("other")]
        );
    }

    #[test]
    fn cells_are_typed_independently_of_their_neighbours() {
        let mut mixed = RecordTable::new(vec![
            "NUM_PHONENUMBERS".to_string(),
            "region_code".to_string(),
        ]);
        mixed.push_row(vec![text("n/a"), text("North")]);
        mixed.push_row(vec![text("n/a"), text("n/a")]);
        mixed.push_row(vec![text("5"), text("12,5")]);

        let mut alone = RecordTable::new(vec![
            "NUM_PHONENUMBERS".to_string(),
            "region_code".to_string(),
        ]);
        alone.push_row(vec![text("5"), text("12,5")]);

        let mixed = normalize(mixed);
        let alone = normalize(alone);

        assert_eq!(mixed.row(2), alone.row(0));
        assert_eq!(
            mixed.column("num_phonenumbers").expect("column").values,
            vec![Cell::Missing, Cell::Missing, Cell::Number(5.0)]
        );
        assert_eq!(
            mixed.column("region_code").expect("column").values,
            vec![text("north"), text("n/a"), Cell::Number(12.5)]
        );
    }

    #[test]
    fn boolean_text_becomes_flags() {
        let mut table = RecordTable::new(vec!["was_canceled".to_string()]);
        table.push_row(vec![text("True")]);
        table.push_row(vec![text(" false ")]);
        table.push_row(vec![Cell::Bool(true)]);

        let normalized = normalize(table);
        assert_eq!(
            normalized.column("was_canceled").expect("column").values,
            vec![Cell::Bool(true), Cell::Bool(false), Cell::Bool(true)]
        );
    }

    #[test]
    fn identifier_columns_are_preserved_verbatim() {
        let mut table = RecordTable::new(vec!["CONTRACT_ID".to_string()]);
        table.push_row(vec![text(" AB-0012 ")]);

        let normalized = normalize(table);
        assert_eq!(
            normalized.column("contract_id").expect("column").values,
            vec![text("AB-0012")]
        );
    }
}
