use ethers::prelude::*;

abigen!(
    CurveGaugeController,
    r#"[
        function get_gauge_weight(address addr) external view returns (uint256)
        function get_total_weight() external view returns (uint256)
        event NewGaugeWeight(address gauge_address, uint256 time, uint256 weight, uint256 total_weight)
        event VoteForGauge(uint256 time, address user, address gauge_addr, uint256 weight)
    ]"#
);
