/// All persistent entity identifiers (students, exams) are 64-bit integers.
pub type DbId = i64;
