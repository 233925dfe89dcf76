use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct StoreRow {
    #[tabled(rename = "Store")]
    pub store: String,
    #[tabled(rename = "Records")]
    pub records: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<StoreRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, store: &str, records: &str) {
        self.rows.push(StoreRow {
            store: store.to_string(),
            records: records.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(rows: &[(String, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (store, records) in rows {
        builder.add_row(store, records);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_nothing() {
        assert!(stats_table(&[]).is_empty());
    }

    #[test]
    fn test_table_lists_every_store() {
        let rows = vec![
            ("messages".to_string(), "3".to_string()),
            ("questions".to_string(), "12".to_string()),
        ];
        let rendered = stats_table(&rows);
        assert!(rendered.contains("Store"));
        assert!(rendered.contains("messages"));
        assert!(rendered.contains("12"));
    }
}
