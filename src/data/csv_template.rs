// Column layout accepted by the bulk import.
pub const HEADER: [&str; 11] = [
    "Nome",
    "Código",
    "Categoria",
    "Descrição",
    "Valor",
    "Status",
    "Andar",
    "Sala",
    "Fornecedor",
    "Garantia",
    "Número de Série",
];

pub const EXAMPLE: [&str; 11] = [
    "Notebook Dell Inspiron",
    "NB001",
    "Informática",
    "Notebook para uso administrativo, 16GB RAM",
    "3500.00",
    "Ativo",
    "11º Andar - Tecnologia",
    "Sala de TI",
    "Dell",
    "2026-12-31",
    "ABC123XYZ",
];

pub const FILE_NAME: &str = "template_importacao.csv";

pub fn render() -> String {
    format!("{}\n{}\n", join_row(&HEADER), join_row(&EXAMPLE))
}

fn join_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<String>>()
        .join(",")
}

fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
