pub mod synthetic_frames;
