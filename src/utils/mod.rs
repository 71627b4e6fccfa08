pub mod dates;
pub mod db_utils;
