pub mod top_k_selector;
