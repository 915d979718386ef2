//! Hand-off of a finished upload to the visualizer route.

use uuid::Uuid;

use crate::ingest::EncodedPayload;

/// A completed upload addressed to `/visualizer/<id>`.
#[derive(Debug, Clone)]
pub struct Handoff {
    id: Uuid,
    payload: EncodedPayload,
}

impl Handoff {
    pub fn new(payload: EncodedPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn route(&self) -> String {
        format!("/visualizer/{}", self.id)
    }

    pub fn payload(&self) -> &EncodedPayload {
        &self.payload
    }

    pub fn into_payload(self) -> EncodedPayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::encode::encode_data_uri;

    #[test]
    fn route_embeds_id() {
        let handoff = Handoff::new(encode_data_uri("image/png", b"x"));
        assert_eq!(handoff.route(), format!("/visualizer/{}", handoff.id()));
        assert_eq!(handoff.payload().mime_type(), "image/png");
    }
}
