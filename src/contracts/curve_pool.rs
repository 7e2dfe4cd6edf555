use ethers::prelude::*;

// Compound-style two-coin pools (cDAI+cUSDC) index coins with int128
abigen!(
    CurvePoolX2,
    r#"[
        function coins(int128 i) external view returns (address)
        function balances(int128 i) external view returns (uint256)
        function get_virtual_price() external view returns (uint256)
    ]"#
);

// 3pool (DAI+USDC+USDT)
abigen!(
    CurvePoolX3,
    r#"[
        function coins(uint256 i) external view returns (address)
        function balances(uint256 i) external view returns (uint256)
        function get_virtual_price() external view returns (uint256)
    ]"#
);

// y-style four-coin pools (yDAI+yUSDC+yUSDT+yTUSD)
abigen!(
    CurvePoolX4,
    r#"[
        function coins(int128 i) external view returns (address)
        function balances(int128 i) external view returns (uint256)
        function get_virtual_price() external view returns (uint256)
    ]"#
);
