//! Envelope builder methods.

use serde::Serialize;
use serde_json::Value;

use super::{Data, ErrorOpt, ErrorPayload, Reply, Status};
use crate::core::Result;

impl Reply<'_> {
    /// Set the data and mark the reply `SUCCESS`.
    pub fn success(&mut self, data: impl Into<Data>) -> &mut Self {
        self.state.envelope.meta.status = Some(Status::Success);
        self.state.envelope.data = data.into();
        self
    }

    /// Serialize `data` to JSON and mark the reply `SUCCESS`.
    pub fn success_json<T>(&mut self, data: &T) -> Result<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(data)?;
        Ok(self.success(Data::Json(value)))
    }

    /// Set an error payload and mark the reply `ERROR`.
    pub fn error(&mut self, code: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.error_with(code, message, std::iter::empty())
    }

    /// Like [`Reply::error`], applying `opts` in order.
    pub fn error_with<I>(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        opts: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = ErrorOpt>,
    {
        let mut payload = ErrorPayload::new(code, message);
        for opt in opts {
            payload.apply(opt);
        }

        self.state.envelope.meta.status = Some(Status::Error);
        self.state.envelope.data = Data::Error(payload);
        self
    }

    /// Set `meta.information`.
    pub fn info(&mut self, information: impl Into<String>) -> &mut Self {
        self.state.envelope.meta.info = Some(information.into());
        self
    }

    /// Set `meta.tokens`, replacing any previous tokens.
    pub fn tokens<I, K, V>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.state.envelope.meta.tokens = Some(
            tokens
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Set `meta.debug`.
    ///
    /// One value is stored as-is, several as a list. An empty iterator
    /// leaves the previous value in place.
    pub fn debug<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut values: Vec<Value> = values.into_iter().map(Into::into).collect();
        match values.len() {
            0 => {}
            1 => self.state.envelope.meta.debug = values.pop(),
            _ => self.state.envelope.meta.debug = Some(Value::Array(values)),
        }
        self
    }
}
