/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Read access to the scoreboard snapshot and team catalog.
pub mod match_service;
/// Server-Sent Events snapshot stream.
pub mod sse_service;
/// WebSocket connection and message handling service.
pub mod websocket_service;
