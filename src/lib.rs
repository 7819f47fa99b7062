/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 18/10/2026
License: MIT
*/
pub mod frame_cache;
pub mod io_utils;
pub mod structures;
pub mod tools;
pub mod vector;
