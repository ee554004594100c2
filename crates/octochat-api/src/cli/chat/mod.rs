//! Interactive chat with a ready bot.
//!
//! Implements the chat loop: async line input, slash commands, a thinking
//! spinner while the runtime answers, and markdown rendering of replies.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
