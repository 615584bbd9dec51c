
pub use self::in_memory_test::{
    InMemoryTestCursor, InMemoryTestDriver, InMemoryTestResponse, InMemoryTestResponseBuilder, RecordedQuery,
};
