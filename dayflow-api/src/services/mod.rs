//! Outbound clients and request orchestration
//!
//! Provider clients (Supabase, Groq, Gemini) sit behind the traits in
//! [`llm`], [`supabase_auth`] and [`event_store`]; the remaining modules
//! combine them into what the handlers serve.

pub mod event_store;
pub mod gemini_client;
pub mod groq_client;
pub mod insights;
pub mod llm;
pub mod range_report;
pub mod schedule_parser;
pub mod supabase_auth;
pub mod supabase_store;
pub mod task_insight;

pub use event_store::{EventQuery, EventStore, StoreError};
pub use gemini_client::GeminiClient;
pub use groq_client::GroqClient;
pub use insights::{generate_day_insights, DayInsights};
pub use llm::{CompletionRequest, ImageInput, LlmError, TextModel, VisionModel};
pub use range_report::{build_range_report, DateRange, RangeReport};
pub use schedule_parser::{parse_with_text_model, parse_with_vision_model, ParsedEvent};
pub use supabase_auth::{AuthError, AuthProvider, AuthUser, SupabaseAuth};
pub use supabase_store::SupabaseEventStore;
pub use task_insight::{task_insight, TaskDetails};
