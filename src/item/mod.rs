/// This module provides the CSV record reader and writer.
pub mod csv;
