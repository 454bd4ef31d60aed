// Request validation, DTOs and the service facade
pub mod api;

// Line-delimited JSON transport over any async reader/writer pair
pub mod jsonl;
