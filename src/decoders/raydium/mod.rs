pub mod clmm;
