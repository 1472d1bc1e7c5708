pub mod threaded_chunk_executor;
