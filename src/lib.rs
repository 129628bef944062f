//! Document Chat Server Library
//!
//! Chat with a document: upload a PDF, DOCX or text file, and every question
//! is sent to the chat backend together with the document's text.
//!
//! # Modules
//!
//! - `document`: Uploaded documents, kind detection, extraction results
//! - `extract`: Text extraction (PDF with OCR fallback, DOCX, text)
//! - `pdf`: PDF engine abstraction over MuPDF
//! - `ocr`: OCR providers for scanned pages
//! - `session`: Conversation sessions and the upload state machine
//! - `transport`: Chat backend client
//! - `routes`: HTTP API

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod pdf;
pub mod routes;
pub mod session;
pub mod state;
pub mod transport;
