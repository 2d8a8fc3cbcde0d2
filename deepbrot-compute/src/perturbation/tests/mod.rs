mod helpers;

mod agreement;
mod series;
