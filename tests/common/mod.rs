#![allow(dead_code)]

use async_trait::async_trait;
use routine_builder::{CompletionBackend, Error, Product, Result, Turn};
use std::sync::{Arc, Mutex};

/// A recorded call to the fake backend
#[derive(Debug, Clone)]
pub struct Call {
    pub messages: Vec<Turn>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
enum Mode {
    Reply(String),
    FailWithStatus(u16),
    HangThenReply(String),
}

/// Completion backend that records every call and answers from a script
#[derive(Debug, Clone)]
pub struct FakeBackend {
    mode: Mode,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            mode: Mode::Reply(reply.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            mode: Mode::FailWithStatus(status),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Never answers the first call; replies to every later one
    pub fn hanging_then_replying(reply: &str) -> Self {
        Self {
            mode: Mode::HangThenReply(reply.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, messages: &[Turn], max_tokens: u32) -> Result<String> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                messages: messages.to_vec(),
                max_tokens,
            });
            calls.len()
        };
        match &self.mode {
            Mode::Reply(reply) => Ok(reply.clone()),
            Mode::HangThenReply(_) if call_number == 1 => std::future::pending().await,
            Mode::HangThenReply(reply) => Ok(reply.clone()),
            Mode::FailWithStatus(status) => Err(Error::Response(
                "upstream unavailable".to_string(),
                Some(*status),
            )),
        }
    }
}

pub fn foam_wash() -> Product {
    Product::new("Foam Wash", "X", "Cleanser")
        .with_image("https://example.com/foam.png")
        .with_description("A gentle foaming cleanser.")
}

pub fn gel_wash() -> Product {
    Product::new("Gel Wash", "Y", "Cleanser").with_image("https://example.com/gel.png")
}

pub fn night_cream() -> Product {
    Product::new("Night Cream", "X", "Moisturizer")
        .with_description("Rich overnight moisturizer.")
}

pub fn catalog_json() -> String {
    serde_json::json!({
        "products": [foam_wash(), gel_wash(), night_cream()]
    })
    .to_string()
}
