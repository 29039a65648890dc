//! Frame codec for the peer link: a 4-byte big-endian length followed by
//! the JSON encoding of a [`Move`].

use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::game::Move;

pub const MAX_FRAME: usize = 64 * 1024;
const HEADER: usize = 4;

#[derive(Debug, Default, Clone, Copy)]
pub struct MoveCodec;

fn invalid_data<E>(err: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, err)
}

impl Decoder for MoveCodec {
    type Item = Move;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER {
            return Ok(None);
        }
        let len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if len > MAX_FRAME {
            return Err(invalid_data(ProtocolError::FrameTooLarge(len)));
        }
        if src.len() < HEADER + len {
            src.reserve(HEADER + len - src.len());
            return Ok(None);
        }

        src.advance(HEADER);
        let payload = src.split_to(len);
        serde_json::from_slice::<Move>(&payload)
            .map(Some)
            .map_err(invalid_data)
    }
}

impl Encoder<Move> for MoveCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Move, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let payload = serde_json::to_vec(&item).map_err(invalid_data)?;
        if payload.len() > MAX_FRAME {
            return Err(invalid_data(ProtocolError::FrameTooLarge(payload.len())));
        }
        dst.reserve(HEADER + payload.len());
        dst.put_u32(payload.len() as u32);
        dst.extend_from_slice(&payload);
        Ok(())
    }
}
