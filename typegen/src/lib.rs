//! pybotgram type generator library.
//!
//! This crate turns the machine-readable Telegram Bot API schema into the
//! `pybotgram.types` Python package. For every declared type it emits one
//! module containing a keyword-only dataclass:
//!
//! - Field annotations built from the schema's type tokens
//! - A docstring with the type's description and a `Parameters:` section
//! - Imports of referenced types, guarded by `typing.TYPE_CHECKING`
//!
//! plus an `__init__.py` that re-exports every class.
//!
//! ## Modules
//!
//! - [`schema`] - Loading and validating the schema document
//! - [`naming`] - Type name to module file identifier
//! - [`resolve`] - Type tokens to annotation and documentation expressions
//! - [`imports`] - Deferred import blocks
//! - [`docstring`] - Wrapped class docstrings
//! - [`fields`] - Attribute declarations
//! - [`template`] - `{slot}` text templates
//! - [`format`] - External source formatter (black, ruff)
//! - [`output`] - Orchestration and atomic file writing
//! - [`config`] - Run configuration and fixed tables
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use pybotgram_typegen::config::GeneratorConfig;
//! use pybotgram_typegen::format::formatter_for;
//! use pybotgram_typegen::output::generate_and_write;
//!
//! let config = GeneratorConfig::default();
//! let formatter = formatter_for(config.formatter);
//!
//! // dry_run=true renders and formats without touching the output directory
//! let files = generate_and_write(&config, formatter.as_ref(), true).unwrap();
//! for file in &files {
//!     println!("{}", file.file_name);
//! }
//! ```
//!
//! ## Generated Code Structure
//!
//! For a type `Message` with a required `message_id` and an optional `from`:
//!
//! ```text
//! from __future__ import annotations
//!
//! from dataclasses import dataclass
//!
//! import typing
//!
//! if typing.TYPE_CHECKING:
//!     from pybotgram.types import User
//!
//!
//! @dataclass(kw_only=True)
//! class Message:
//!     """This object represents a message.
//!
//!     Parameters:
//!         message_id (``int``):
//!             Unique message identifier inside this chat.
//!
//!         from_user (:obj:`~pybotgram.types.User`, *optional*):
//!             Sender of the message.
//!     """
//!
//!     message_id: int
//!     from_user: User | None = None
//! ```

pub mod config;
pub mod docstring;
pub mod errors;
pub mod fields;
pub mod format;
pub mod imports;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod schema;
pub mod template;

#[cfg(test)]
mod test_utils;
