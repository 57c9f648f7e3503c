/// Position of a row-by-row walk over a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    row_num: usize,
    end_of_table: bool, // Indicates a position one past the last element
}

impl Cursor {
    pub fn table_start(num_rows: usize) -> Self {
        Self {
            row_num: 0,
            end_of_table: num_rows == 0,
        }
    }

    pub fn row_num(&self) -> usize {
        self.row_num
    }

    pub fn advance(&mut self, num_rows: usize) {
        self.row_num += 1;
        if self.row_num >= num_rows {
            self.end_of_table = true;
        }
    }

    pub fn is_end(&self) -> bool {
        self.end_of_table
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;

    #[test]
    fn walks_to_end() {
        let mut cursor = Cursor::table_start(2);
        assert!(!cursor.is_end());
        cursor.advance(2);
        assert_eq!(cursor.row_num(), 1);
        assert!(!cursor.is_end());
        cursor.advance(2);
        assert!(cursor.is_end());
    }

    #[test]
    fn empty_table_starts_at_end() {
        assert!(Cursor::table_start(0).is_end());
    }
}
