//! Test support: record factories
//!
//! Building CASS records by hand means juggling tab separators, node
//! counts, and arity tokens. [`RecordBuilder`] does the bookkeeping so
//! tests state trees declaratively and stay readable. Used by the unit,
//! integration, and property tests; not part of the parsing pipeline.

/// Builds one wire-format record, tracking the node count.
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    fields: Vec<String>,
    count: usize,
}

impl RecordBuilder {
    pub fn new() -> Self {
        RecordBuilder::default()
    }

    /// Leading function-signature descriptor. Counts as a node.
    pub fn fun_sig(mut self, label: &str) -> Self {
        self.fields.push(format!("S{}", label));
        self.count += 1;
        self
    }

    /// Internal node with its `#annotation#structural` label and arity.
    pub fn internal(mut self, annotation_body: &str, label: &str, arity: usize) -> Self {
        self.fields.push(format!("I#{}#{}", annotation_body, label));
        self.fields.push(arity.to_string());
        self.count += 1;
        self
    }

    pub fn number(self, label: &str) -> Self {
        self.tagged('N', label)
    }

    pub fn char_lit(self, label: &str) -> Self {
        self.tagged('C', label)
    }

    pub fn string_lit(self, label: &str) -> Self {
        self.tagged('S', label)
    }

    pub fn global_var(self, label: &str) -> Self {
        self.tagged('V', label)
    }

    pub fn global_fun(self, label: &str) -> Self {
        self.tagged('F', label)
    }

    /// Local variable with raw prev/next-use indices (negative = none).
    pub fn local_var(mut self, label: &str, prev: i64, next: i64) -> Self {
        self.fields.push(format!("v{}", label));
        self.fields.push(prev.to_string());
        self.fields.push(next.to_string());
        self.count += 1;
        self
    }

    /// Local function with raw prev/next-use indices (negative = none).
    pub fn local_fun(mut self, label: &str, prev: i64, next: i64) -> Self {
        self.fields.push(format!("f{}", label));
        self.fields.push(prev.to_string());
        self.fields.push(next.to_string());
        self.count += 1;
        self
    }

    pub fn error(mut self) -> Self {
        self.fields.push("E".to_string());
        self.count += 1;
        self
    }

    fn tagged(mut self, tag: char, label: &str) -> Self {
        self.fields.push(format!("{}{}", tag, label));
        self.count += 1;
        self
    }

    /// Assemble the record line, prepending the node count.
    pub fn build(self) -> String {
        let mut record = self.count.to_string();
        for field in &self.fields {
            record.push('\t');
            record.push_str(field);
        }
        record
    }

    /// Assemble the record with an explicit (possibly wrong) node count.
    pub fn build_with_count(self, count: usize) -> String {
        let mut record = count.to_string();
        for field in &self.fields {
            record.push('\t');
            record.push_str(field);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_matches_hand_written_record() {
        let record = RecordBuilder::new()
            .internal("func_decl", "", 1)
            .number("5")
            .build();
        assert_eq!(record, "2\tI#func_decl#\t1\tN5");
    }

    #[test]
    fn test_builder_counts_fun_sig() {
        let record = RecordBuilder::new()
            .fun_sig("int main()")
            .internal("fd", "x", 1)
            .number("y")
            .build();
        assert_eq!(record, "3\tSint main()\tI#fd#x\t1\tNy");
    }

    #[test]
    fn test_builder_emits_use_indices() {
        let record = RecordBuilder::new()
            .internal("d", "s", 2)
            .local_var("x", -1, 2)
            .local_var("x", 1, -1)
            .build();
        assert_eq!(record, "3\tI#d#s\t2\tvx\t-1\t2\tvx\t1\t-1");
    }
}
