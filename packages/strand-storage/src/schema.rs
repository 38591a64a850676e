pub fn render_schema() -> String {
	include_str!("../../../sql/init.sql").to_string()
}

pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}
