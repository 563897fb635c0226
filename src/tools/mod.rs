pub mod csv_template;
pub mod labels;
pub mod qr;
pub mod serve;
pub mod templates;
