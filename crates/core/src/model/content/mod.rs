mod block;

pub use block::{
    AudioBlock, ContentBlock, ImageBlock, LinkBlock, NumberLine, PhonemePair, VectorGraphic,
    WordAudio,
};
