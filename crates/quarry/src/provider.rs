use crate::{
    diagnostics::{self, TraceEvent},
    error::Error,
    materialize::Rows,
    query::{
        builder::QueryBuilder,
        fingerprint::fingerprint,
        node::QueryNode,
        translate::{QueryText, translate},
    },
    source::RowSource,
    traits::Record,
};
use std::sync::Arc;

///
/// QueryProvider
///
/// Bridge between compiled query text and the external row source.
/// Stateless beyond the row-source handle: nothing query-specific is
/// retained between calls, so any number of builders can share one
/// provider. Cloning shares the same row source.
///

#[derive(Clone)]
pub struct QueryProvider {
    source: Arc<dyn RowSource>,
}

impl QueryProvider {
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self { source }
    }

    /// Root a new builder at `R`'s table.
    #[must_use]
    pub fn table<R: Record>(&self) -> QueryBuilder<R> {
        QueryBuilder::new(self.clone())
    }

    /// Compile a node tree without executing it. Side-effect-free.
    pub fn query_text(&self, node: &QueryNode) -> Result<QueryText, Error> {
        Ok(translate(node)?)
    }

    /// Compile and execute a node tree, returning the lazy typed
    /// sequence. Translation failures abort before the row source is
    /// touched; row-source failures propagate unchanged.
    pub fn execute<R: Record>(&self, node: &QueryNode) -> Result<Rows<R>, Error> {
        let text = translate(node)?;
        let fingerprint = fingerprint(node);
        diagnostics::emit(TraceEvent::ExecuteStart { fingerprint });
        let stream = self.source.open_cursor(&text)?;
        Ok(Rows::new(stream, fingerprint))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        diagnostics::{self, TraceEvent},
        error::ErrorClass,
        test_support::{BufferSink, Customer, MemoryRowSource, london_source, provider},
    };

    #[test]
    fn row_source_failures_propagate_unchanged() {
        let source = MemoryRowSource::failing("connection lost");
        let err = provider(&source)
            .table::<Customer>()
            .to_vec()
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::ExecutionFailed);
        assert_eq!(err.to_string(), "row source failed: connection lost");
    }

    #[test]
    fn query_text_is_side_effect_free() {
        let source = london_source();
        let sink = BufferSink::install();

        let query = provider(&source)
            .table::<Customer>()
            .filter(|c| c.field("City").eq("London"));
        let _ = query.to_text().unwrap();

        assert_eq!(source.open_count(), 0);
        assert_eq!(sink.events(), Vec::new());
        diagnostics::clear_sink();
    }

    #[test]
    fn execution_emits_start_and_finish_events() {
        let source = london_source();
        let sink = BufferSink::install();

        let query = provider(&source).table::<Customer>();
        let fingerprint = query.fingerprint();
        let customers = query.to_vec().unwrap();
        assert_eq!(customers.len(), 2);

        assert_eq!(
            sink.events(),
            vec![
                TraceEvent::ExecuteStart { fingerprint },
                TraceEvent::ExecuteFinish {
                    fingerprint,
                    rows: 2
                },
            ]
        );
        diagnostics::clear_sink();
    }
}
