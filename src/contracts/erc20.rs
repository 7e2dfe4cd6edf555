use ethers::prelude::*;

abigen!(
    Erc20,
    r#"[
        function decimals() external view returns (uint8)
    ]"#
);
