pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, section, success, summary_row};
pub use table::{quizzes_table, results_table, stats_table, students_table, topics_table};
pub use theme::{theme, Theme};
