pub mod db_tests;
pub mod normalizer_tests;
