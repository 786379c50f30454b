//! Shared test-only fixtures: an in-memory row source and a small
//! Northwind-flavored record family.

use crate::{
    diagnostics::{TraceEvent, TraceSink},
    materialize::Rows,
    model::{FieldKind, FieldModel, RecordModel},
    provider::QueryProvider,
    query::{fingerprint::fingerprint, node::QueryNode},
    source::{RowSource, RowStream, SourceError},
    traits::Record,
    value::Value,
};
use std::{cell::RefCell, collections::VecDeque, rc::Rc, sync::Arc};

///
/// Customer
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Customer {
    pub customer_id: String,
    pub contact_name: Option<String>,
    pub city: String,
    pub country: String,
}

impl Record for Customer {
    const MODEL: RecordModel = RecordModel {
        table: "Customers",
        fields: &[
            FieldModel::new("CustomerID", FieldKind::Text),
            FieldModel::nullable("ContactName", FieldKind::Text),
            FieldModel::new("City", FieldKind::Text),
            FieldModel::new("Country", FieldKind::Text),
        ],
    };

    fn set(&mut self, field: &'static str, value: Value) {
        match (field, value) {
            ("CustomerID", Value::Text(v)) => self.customer_id = v,
            ("ContactName", Value::Text(v)) => self.contact_name = Some(v),
            ("City", Value::Text(v)) => self.city = v,
            ("Country", Value::Text(v)) => self.country = v,
            _ => {}
        }
    }
}

///
/// Order
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: String,
    pub freight: f64,
    pub shipped: bool,
}

impl Record for Order {
    const MODEL: RecordModel = RecordModel {
        table: "Orders",
        fields: &[
            FieldModel::new("OrderID", FieldKind::Int),
            FieldModel::new("CustomerID", FieldKind::Text),
            FieldModel::new("Freight", FieldKind::Float),
            FieldModel::new("Shipped", FieldKind::Bool),
        ],
    };

    fn set(&mut self, field: &'static str, value: Value) {
        match (field, value) {
            ("OrderID", Value::Int(v)) => self.order_id = v,
            ("CustomerID", Value::Text(v)) => self.customer_id = v,
            ("Freight", Value::Float(v)) => self.freight = v,
            ("Shipped", Value::Bool(v)) => self.shipped = v,
            _ => {}
        }
    }
}

///
/// MemoryRowSource
///
/// In-memory row source. Records every query text it is asked to
/// open, honors a leading `SELECT TOP n` by truncating, and can be
/// configured to fail every open.
///

pub struct MemoryRowSource {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    fail_with: Option<String>,
    opened: RefCell<Vec<String>>,
}

impl MemoryRowSource {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Arc<Self> {
        Arc::new(Self {
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
            fail_with: None,
            opened: RefCell::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            columns: Vec::new(),
            rows: Vec::new(),
            fail_with: Some(message.to_string()),
            opened: RefCell::new(Vec::new()),
        })
    }

    /// Number of cursors opened so far.
    pub fn open_count(&self) -> usize {
        self.opened.borrow().len()
    }

    /// Most recent query text seen.
    pub fn last_query(&self) -> Option<String> {
        self.opened.borrow().last().cloned()
    }
}

impl RowSource for MemoryRowSource {
    fn open_cursor(&self, query_text: &str) -> Result<Box<dyn RowStream>, SourceError> {
        self.opened.borrow_mut().push(query_text.to_string());
        if let Some(message) = &self.fail_with {
            return Err(SourceError::failed(message.clone()));
        }
        let rows: VecDeque<Vec<Value>> = match parse_top(query_text) {
            Some(n) => self.rows.iter().take(n).cloned().collect(),
            None => self.rows.iter().cloned().collect(),
        };
        Ok(Box::new(MemoryStream {
            columns: self.columns.clone(),
            rows,
        }))
    }
}

fn parse_top(query_text: &str) -> Option<usize> {
    let rest = query_text.strip_prefix("SELECT TOP ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

struct MemoryStream {
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
}

impl RowStream for MemoryStream {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<Value>>, SourceError> {
        Ok(self.rows.pop_front())
    }
}

///
/// BufferSink
///
/// Trace sink that buffers events for assertions.
///

#[derive(Default)]
pub struct BufferSink {
    events: RefCell<Vec<TraceEvent>>,
}

impl BufferSink {
    /// Create a sink and install it for the current thread.
    pub fn install() -> Rc<Self> {
        let sink = Rc::new(Self::default());
        crate::diagnostics::set_sink(sink.clone());
        sink
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }
}

impl TraceSink for BufferSink {
    fn record(&self, event: TraceEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Provider over an in-memory source.
pub fn provider(source: &Arc<MemoryRowSource>) -> QueryProvider {
    QueryProvider::new(source.clone())
}

/// Materializing row sequence over an in-memory customer stream.
pub fn customers(columns: &[&str], rows: Vec<Vec<Value>>) -> Rows<Customer> {
    memory_rows(Customer::MODEL.table, columns, rows)
}

/// Materializing row sequence over an in-memory order stream.
pub fn orders(columns: &[&str], rows: Vec<Vec<Value>>) -> Rows<Order> {
    memory_rows(Order::MODEL.table, columns, rows)
}

fn memory_rows<R: Record>(table: &'static str, columns: &[&str], rows: Vec<Vec<Value>>) -> Rows<R> {
    let source = MemoryRowSource::new(columns, rows);
    let stream = source
        .open_cursor(&format!("SELECT * FROM {table}"))
        .expect("memory cursor");
    Rows::new(stream, fingerprint(&QueryNode::table(table)))
}

/// The canonical two-customer London fixture.
pub fn london_source() -> Arc<MemoryRowSource> {
    MemoryRowSource::new(
        &["CustomerID", "ContactName", "City", "Country"],
        vec![
            vec![
                Value::Text("AROUT".into()),
                Value::Text("Thomas Hardy".into()),
                Value::Text("London".into()),
                Value::Text("UK".into()),
            ],
            vec![
                Value::Text("BSBEV".into()),
                Value::Null,
                Value::Text("London".into()),
                Value::Text("UK".into()),
            ],
        ],
    )
}
