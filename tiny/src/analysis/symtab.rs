use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    /// Memory location, assigned at the first occurrence.
    pub location: usize,
    /// Lines the name occurs on, in order of appearance; the first is the defining line.
    pub lines: Vec<usize>,
}

impl Symbol {
    pub fn defining_line(&self) -> usize {
        self.lines.first().copied().unwrap_or_default()
    }
}

/// Flat, single-scope table of every variable in a program.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
    next_location: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.symbols.get(name).map(|symbol| symbol.location)
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Defines `name` on `line` if it is new, otherwise records another
    /// occurrence. Returns the name's location either way.
    pub fn insert_or_record(&mut self, name: &str, line: usize) -> usize {
        if let Some(symbol) = self.symbols.get_mut(name) {
            if !symbol.lines.contains(&line) {
                symbol.lines.push(line);
            }
            return symbol.location;
        }

        let location = self.next_location;
        self.next_location += 1;
        tracing::trace!(name, line, location, "symbol defined");
        self.symbols.insert(
            name.to_string(),
            Symbol { name: name.to_string(), location, lines: vec![line] },
        );
        location
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols ordered by location.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        let mut symbols: Vec<&Symbol> = self.symbols.values().collect();
        symbols.sort_by_key(|symbol| symbol.location);
        symbols.into_iter()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Name  Location   Line Numbers")?;
        writeln!(f, "-------------  --------   ------------")?;
        for symbol in self.iter() {
            write!(f, "{:<14} {:<8}  ", symbol.name, symbol.location)?;
            for line in &symbol.lines {
                write!(f, "{line:4} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_are_sequential() {
        let mut table = SymbolTable::new();
        assert_eq!(table.insert_or_record("x", 1), 0);
        assert_eq!(table.insert_or_record("y", 2), 1);
        assert_eq!(table.insert_or_record("x", 3), 0);
        assert_eq!(table.insert_or_record("z", 3), 2);

        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("y"), Some(1));
        assert_eq!(table.lookup("w"), None);
    }

    #[test]
    fn test_reference_lines() {
        let mut table = SymbolTable::new();
        table.insert_or_record("x", 4);
        table.insert_or_record("x", 4);
        table.insert_or_record("x", 9);

        let symbol = table.get("x").unwrap();
        assert_eq!(symbol.defining_line(), 4);
        assert_eq!(symbol.lines, vec![4, 9]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut table = SymbolTable::new();
        table.insert_or_record("count", 1);
        table.insert_or_record("Count", 1);
        assert_eq!(table.lookup("count"), Some(0));
        assert_eq!(table.lookup("Count"), Some(1));
    }

    #[test]
    fn test_listing() {
        let mut table = SymbolTable::new();
        table.insert_or_record("x", 1);
        table.insert_or_record("x", 2);
        table.insert_or_record("total", 2);

        let expected = [
            "Variable Name  Location   Line Numbers\n",
            "-------------  --------   ------------\n",
            "x              0            1    2 \n",
            "total          1            2 \n",
        ]
        .concat();
        assert_eq!(table.to_string(), expected);
    }
}
